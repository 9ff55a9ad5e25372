use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::{BookingConfirmation, DynAPI, QuoteStatus};
use crate::entities::{Quotation, QuoteRequest};
use crate::error::Error;

pub async fn index() -> &'static str {
    "API Services Healthy."
}

pub async fn request_quotation(
    Extension(api): Extension<DynAPI>,
    Json(request): Json<QuoteRequest>,
) -> Result<(StatusCode, Json<QuoteStatus>), Error> {
    let receipt = api.submit_quote_request(request).await?;

    Ok((StatusCode::ACCEPTED, receipt.into()))
}

pub async fn poll_quotation(
    Extension(api): Extension<DynAPI>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteStatus>, Error> {
    let status = api.poll_quote(quote_id).await?;

    Ok(status.into())
}

pub async fn book(
    Extension(api): Extension<DynAPI>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<BookingConfirmation>, Error> {
    let confirmation = api.book_quote(quote_id).await?;

    Ok(confirmation.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<Quotation>, Error> {
    let order = api.find_order(quote_id).await?;

    Ok(order.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use tokio_test::block_on;

    use crate::api::{OrderAPI, QuoteAPI, API};
    use crate::entities::{Address, ConsigneeDetails, ShipperDetails};
    use crate::error::not_found_error;

    struct StubAPI;

    #[async_trait]
    impl QuoteAPI for StubAPI {
        async fn submit_quote_request(&self, _: QuoteRequest) -> Result<QuoteStatus, Error> {
            Ok(QuoteStatus::Pending {
                quote_id: Uuid::new_v4(),
                eta_seconds: 12,
            })
        }

        async fn poll_quote(&self, quote_id: Uuid) -> Result<QuoteStatus, Error> {
            Ok(QuoteStatus::Pending {
                quote_id,
                eta_seconds: 12,
            })
        }
    }

    #[async_trait]
    impl OrderAPI for StubAPI {
        async fn book_quote(&self, _: Uuid) -> Result<BookingConfirmation, Error> {
            Err(not_found_error("No active quotation found"))
        }

        async fn find_order(&self, _: Uuid) -> Result<Quotation, Error> {
            Err(not_found_error("Order not found"))
        }
    }

    impl API for StubAPI {}

    fn request() -> QuoteRequest {
        QuoteRequest {
            shipper: ShipperDetails {
                address: Address {
                    country: "DE".into(),
                    city: "Berlin".into(),
                    postcode: "10115".into(),
                },
                pickup_on: "2024-01-25T08:00:00Z".parse().unwrap(),
            },
            consignee: ConsigneeDetails {
                address: Address {
                    country: "PL".into(),
                    city: "Slupsk".into(),
                    postcode: "76-200".into(),
                },
                deliver_on: "2024-01-30".parse().unwrap(),
            },
        }
    }

    #[test]
    fn accepted_quotation_request_returns_202() {
        let api = Arc::new(StubAPI) as DynAPI;

        let response = block_on(request_quotation(Extension(api), Json(request())))
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn booking_errors_surface_as_404() {
        let api = Arc::new(StubAPI) as DynAPI;

        let response = block_on(book(Extension(api), Path(Uuid::new_v4())))
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
