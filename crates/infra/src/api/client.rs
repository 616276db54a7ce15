//! HTTP implementation of the [`BookingsApi`] port.
//!
//! Rejection classification: the booking service refuses status changes
//! inside the cancellation/modification window with a 403, 409, or 422
//! whose body carries a recognizable code. Those map to
//! `MutationRejected { kind: TimeRestriction }`; other client errors map to
//! `MutationRejected { kind: Other }`, and server errors to `Network` (the
//! HTTP layer has already retried them).

use async_trait::async_trait;
use bookdesk_core::BookingsApi;
use bookdesk_domain::{
    BookdeskError, Booking, BookingDraft, BookingPatch, BookingWindow, RejectionKind, Result,
    ScheduleBlock,
};
use reqwest::{Method, Response, StatusCode};
use tracing::debug;
use url::Url;

use super::types::{BookingCreateDto, BookingDto, BookingPatchDto, ErrorBody, ScheduleBlockDto};
use crate::http::HttpClient;

/// Body codes the service uses for window-based refusals.
const TIME_RESTRICTION_CODES: [&str; 3] =
    ["time_restriction", "cancellation_window_passed", "modification_window_passed"];

/// Client for the remote booking service.
#[derive(Clone)]
pub struct BookingApiClient {
    http: HttpClient,
    base_url: Url,
}

impl BookingApiClient {
    pub fn new(base_url: Url, http: HttpClient) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BookdeskError::Config(format!("invalid API endpoint '{path}': {e}")))
    }

    /// Turn a non-success read response into a domain error.
    async fn read_failure(response: Response) -> BookdeskError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.message.unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        });

        if status == StatusCode::NOT_FOUND {
            BookdeskError::NotFound(message)
        } else {
            BookdeskError::Network(format!("HTTP {}: {message}", status.as_u16()))
        }
    }

    /// Turn a non-success mutation response into a domain error.
    async fn mutation_failure(response: Response) -> BookdeskError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.message.clone().unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        });

        let window_refusal = matches!(
            status,
            StatusCode::FORBIDDEN | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
        ) && body
            .code
            .as_deref()
            .is_some_and(|code| TIME_RESTRICTION_CODES.contains(&code));

        if window_refusal {
            debug!(%status, code = ?body.code, "mutation refused by time restriction");
            return BookdeskError::MutationRejected {
                kind: RejectionKind::TimeRestriction,
                message,
            };
        }

        if status == StatusCode::NOT_FOUND {
            return BookdeskError::NotFound(message);
        }

        if status.is_client_error() {
            return BookdeskError::MutationRejected { kind: RejectionKind::Other, message };
        }

        BookdeskError::Network(format!("HTTP {}: {message}", status.as_u16()))
    }
}

#[async_trait]
impl BookingsApi for BookingApiClient {
    async fn fetch_bookings(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        let url = self.endpoint(&format!("resources/{resource_id}/bookings"))?;
        let request = self
            .http
            .request(Method::GET, url)
            .query(&[("start", window.start.to_rfc3339()), ("end", window.end.to_rfc3339())]);

        let response = self.http.send(request).await?;
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let dtos: Vec<BookingDto> = self.http.read_json(response).await?;
        debug!(resource_id, count = dtos.len(), "fetched bookings");
        Ok(dtos.into_iter().map(BookingDto::into_domain).collect())
    }

    async fn fetch_schedule_blocks(&self, resource_id: &str) -> Result<Vec<ScheduleBlock>> {
        let url = self.endpoint(&format!("resources/{resource_id}/schedule"))?;
        let response = self.http.send(self.http.request(Method::GET, url)).await?;
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let dtos: Vec<ScheduleBlockDto> = self.http.read_json(response).await?;
        dtos.into_iter().map(ScheduleBlockDto::into_domain).collect()
    }

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking> {
        let url = self.endpoint("bookings")?;
        let request =
            self.http.request(Method::POST, url).json(&BookingCreateDto::from(draft));

        let response = self.http.send(request).await?;
        if !response.status().is_success() {
            return Err(Self::mutation_failure(response).await);
        }

        let dto: BookingDto = self.http.read_json(response).await?;
        Ok(dto.into_domain())
    }

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(BookdeskError::InvalidInput("empty booking patch".into()));
        }

        let url = self.endpoint(&format!("bookings/{id}"))?;
        let request =
            self.http.request(Method::PATCH, url).json(&BookingPatchDto::from(patch));

        let response = self.http.send(request).await?;
        if !response.status().is_success() {
            return Err(Self::mutation_failure(response).await);
        }
        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("bookings/{id}"))?;
        let response = self.http.send(self.http.request(Method::DELETE, url)).await?;
        if !response.status().is_success() {
            return Err(Self::mutation_failure(response).await);
        }
        Ok(())
    }
}
