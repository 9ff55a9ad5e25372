use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::{
    entities::Address,
    error::{invalid_input_error, upstream_error, Error},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Boundary to the external geographic-distance service. The worker never
/// calls it for two jobs concurrently; the upstream rate limit is
/// respected through queue pacing, not here.
#[async_trait]
pub trait DistanceResolver: Send + Sync {
    async fn resolve(&self, shipper: &Address, consignee: &Address) -> Result<f64, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DistanceResponse {
    distance: f64,
}

#[derive(Debug, Default)]
pub struct DistanceService;

impl DistanceService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DistanceResolver for DistanceService {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, shipper: &Address, consignee: &Address) -> Result<f64, Error> {
        let api_base = env::var("DISTANCE_API_BASE")?;
        let credentials = env::var("DISTANCE_API_CREDENTIALS")?;

        let url = format!(
            "https://{}/distances/{}/{}/{}/{}",
            api_base, shipper.country, shipper.postcode, consignee.country, consignee.postcode
        );

        let res = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?
            .get(url)
            .header("Authorization", credentials)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: DistanceResponse = res.json().await?;

        Ok(data.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    struct FixedDistance(f64);

    #[async_trait]
    impl DistanceResolver for FixedDistance {
        async fn resolve(&self, _: &Address, _: &Address) -> Result<f64, Error> {
            Ok(self.0)
        }
    }

    #[test]
    fn resolver_is_object_safe() {
        let resolver: Box<dyn DistanceResolver> = Box::new(FixedDistance(100.0));

        let shipper = Address {
            country: "DE".into(),
            city: "Berlin".into(),
            postcode: "10115".into(),
        };
        let consignee = Address {
            country: "PL".into(),
            city: "Slupsk".into(),
            postcode: "76-200".into(),
        };

        let distance = block_on(resolver.resolve(&shipper, &consignee)).unwrap();

        assert_eq!(distance, 100.0);
    }
}
