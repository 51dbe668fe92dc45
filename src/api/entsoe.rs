//! [ENTSO-E Transparency Platform](https://transparency.entsoe.eu) client.

use chrono::{DateTime, DurationRound, SecondsFormat, TimeDelta, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    api::client,
    core::{
        emission::FuelType,
        error::{Error, FetchError, Result as CoreResult},
        feed::Feed,
        production::ProductionSnapshot,
    },
    prelude::*,
    quantity::power::Megawatts,
};

pub const DEFAULT_BASE_URL: &str = "https://web-api.tp.entsoe.eu/api";

pub const TOKEN_HELP: &str = "Get your token at https://transparency.entsoe.eu/";

/// Belgian bidding zone.
const BELGIUM_DOMAIN: &str = "10YBE----------2";

const PERIOD_FORMAT: &str = "%Y%m%d%H%M";

pub struct Api {
    client: Client,
    base_url: Url,
    security_token: String,
}

impl Api {
    pub fn try_new(base_url: Url, security_token: String) -> Result<Self> {
        Ok(Self { client: client::try_new()?, base_url, security_token })
    }

    /// Fetch the actual generation per production type over the trailing 24 hours,
    /// and take the latest reported point of each type.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn fetch_latest_production(
        &self,
        now: DateTime<Utc>,
    ) -> CoreResult<ProductionSnapshot> {
        let period_end = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
        let period_start = period_end - TimeDelta::hours(24);
        info!(%period_start, %period_end, "fetching the actual generation…");

        let document = self
            .get_document(period_start, period_end)
            .await
            .map_err(|cause| Error::SourceFetch { feed: Feed::ActualGeneration, cause })?;
        let snapshot = document.into_snapshot(period_end);
        info!(total = %snapshot.total, carbon_intensity = %snapshot.carbon_intensity, "fetched");
        Ok(snapshot)
    }

    async fn get_document(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Document, FetchError> {
        let body = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("securityToken", self.security_token.as_str()),
                ("documentType", "A75"),
                ("processType", "A16"),
                ("in_Domain", BELGIUM_DOMAIN),
                ("periodStart", &period_start.format(PERIOD_FORMAT).to_string()),
                ("periodEnd", &period_end.format(PERIOD_FORMAT).to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(quick_xml::de::from_str(&body)?)
    }
}

/// Generation load document.
///
/// When there is no data, the platform answers with an acknowledgement document instead,
/// which deserializes into an empty one.
#[derive(Deserialize)]
struct Document {
    #[serde(rename = "TimeSeries", default)]
    time_series: Vec<TimeSeries>,
}

impl Document {
    fn into_snapshot(self, period_end: DateTime<Utc>) -> ProductionSnapshot {
        let timestamp = self
            .time_series
            .iter()
            .flat_map(|time_series| &time_series.periods)
            .next()
            .and_then(|period| period.time_interval.as_ref())
            .and_then(|time_interval| time_interval.end.clone())
            .unwrap_or_else(|| period_end.to_rfc3339_opts(SecondsFormat::Secs, true));
        let generation = self.time_series.into_iter().filter_map(|time_series| {
            // Series without a production type and last points without a quantity are skipped:
            let fuel_type = time_series.psr_type?.psr_type;
            let point =
                time_series.periods.into_iter().flat_map(|period| period.points).next_back()?;
            Some((fuel_type, Megawatts(point.quantity?)))
        });
        ProductionSnapshot::new(timestamp, generation)
    }
}

#[derive(Deserialize)]
struct TimeSeries {
    #[serde(rename = "MktPSRType")]
    psr_type: Option<MktPsrType>,

    #[serde(rename = "Period", default)]
    periods: Vec<Period>,
}

#[serde_as]
#[derive(Deserialize)]
struct MktPsrType {
    #[serde(rename = "psrType")]
    #[serde_as(as = "DisplayFromStr")]
    psr_type: FuelType,
}

#[derive(Deserialize)]
struct Period {
    #[serde(rename = "timeInterval")]
    time_interval: Option<TimeInterval>,

    #[serde(rename = "Point", default)]
    points: Vec<Point>,
}

#[derive(Deserialize)]
struct TimeInterval {
    /// Minute precision, for example `2025-10-16T10:00Z`.
    end: Option<String>,
}

#[derive(Deserialize)]
struct Point {
    quantity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use wiremock::{
        Mock,
        MockServer,
        ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    // language=XML
    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <GL_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-6:generationloaddocument:3:0">
            <mRID>a1b2c3</mRID>
            <type>A75</type>
            <process.processType>A16</process.processType>
            <time_Period.timeInterval>
                <start>2025-10-15T10:00Z</start>
                <end>2025-10-16T10:00Z</end>
            </time_Period.timeInterval>
            <TimeSeries>
                <mRID>1</mRID>
                <quantity_Measure_Unit.name>MAW</quantity_Measure_Unit.name>
                <MktPSRType>
                    <psrType>B14</psrType>
                </MktPSRType>
                <Period>
                    <timeInterval>
                        <start>2025-10-15T10:00Z</start>
                        <end>2025-10-16T09:45Z</end>
                    </timeInterval>
                    <resolution>PT15M</resolution>
                    <Point>
                        <position>1</position>
                        <quantity>3800</quantity>
                    </Point>
                    <Point>
                        <position>2</position>
                        <quantity>3000</quantity>
                    </Point>
                </Period>
            </TimeSeries>
            <TimeSeries>
                <mRID>2</mRID>
                <MktPSRType>
                    <psrType>B04</psrType>
                </MktPSRType>
                <Period>
                    <timeInterval>
                        <start>2025-10-15T10:00Z</start>
                        <end>2025-10-16T10:00Z</end>
                    </timeInterval>
                    <resolution>PT15M</resolution>
                    <Point>
                        <position>1</position>
                        <quantity>1000.5</quantity>
                    </Point>
                </Period>
            </TimeSeries>
            <TimeSeries>
                <mRID>3</mRID>
                <MktPSRType>
                    <psrType>B19</psrType>
                </MktPSRType>
                <Period>
                    <resolution>PT15M</resolution>
                    <Point>
                        <position>1</position>
                        <quantity>999.5</quantity>
                    </Point>
                </Period>
            </TimeSeries>
        </GL_MarketDocument>
    "#;

    // language=XML
    const ACKNOWLEDGEMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <Acknowledgement_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-1:acknowledgementdocument:7:0">
            <mRID>d4e5f6</mRID>
            <Reason>
                <code>999</code>
                <text>No matching data found</text>
            </Reason>
        </Acknowledgement_MarketDocument>
    "#;

    fn period_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 16, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_document_ok() -> Result {
        let snapshot = quick_xml::de::from_str::<Document>(DOCUMENT)?.into_snapshot(period_end());
        assert_eq!(snapshot.timestamp, "2025-10-16T09:45Z");
        assert_abs_diff_eq!(snapshot.production[&FuelType::Nuclear].0, 3000.0);
        assert_abs_diff_eq!(snapshot.production[&FuelType::FossilGas].0, 1000.5);
        assert_abs_diff_eq!(snapshot.production[&FuelType::WindOnshore].0, 999.5);
        assert_abs_diff_eq!(snapshot.total.0, 5000.0);
        // (3000 × 5 + 1000.5 × 490 + 999.5 × 11.5) / 5000
        assert_abs_diff_eq!(snapshot.carbon_intensity.0, 103.34785, epsilon = 1e-9);
        Ok(())
    }

    // language=XML
    const INCOMPLETE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <GL_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-6:generationloaddocument:3:0">
            <TimeSeries>
                <MktPSRType>
                    <psrType>B14</psrType>
                </MktPSRType>
                <Period>
                    <Point>
                        <position>1</position>
                        <quantity>1000</quantity>
                    </Point>
                </Period>
            </TimeSeries>
            <TimeSeries>
                <Period>
                    <Point>
                        <position>1</position>
                        <quantity>1000</quantity>
                    </Point>
                </Period>
            </TimeSeries>
            <TimeSeries>
                <MktPSRType>
                    <psrType>B02</psrType>
                </MktPSRType>
                <Period>
                    <Point>
                        <position>1</position>
                        <quantity>500</quantity>
                    </Point>
                    <Point>
                        <position>2</position>
                    </Point>
                </Period>
            </TimeSeries>
        </GL_MarketDocument>
    "#;

    #[test]
    fn test_parse_document_skips_incomplete_series() -> Result {
        let snapshot =
            quick_xml::de::from_str::<Document>(INCOMPLETE_DOCUMENT)?.into_snapshot(period_end());
        assert_eq!(snapshot.production.len(), 1);
        assert_abs_diff_eq!(snapshot.production[&FuelType::Nuclear].0, 1000.0);
        assert_abs_diff_eq!(snapshot.total.0, 1000.0);
        assert_abs_diff_eq!(snapshot.carbon_intensity.0, 5.0);
        Ok(())
    }

    #[test]
    fn test_parse_acknowledgement_ok() -> Result {
        let snapshot =
            quick_xml::de::from_str::<Document>(ACKNOWLEDGEMENT)?.into_snapshot(period_end());
        assert_eq!(snapshot.timestamp, "2025-10-16T10:00:00Z");
        assert!(snapshot.production.is_empty());
        assert_abs_diff_eq!(snapshot.carbon_intensity.0, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_latest_production_ok() -> Result {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("securityToken", "token"))
            .and(query_param("documentType", "A75"))
            .and(query_param("processType", "A16"))
            .and(query_param("in_Domain", "10YBE----------2"))
            .and(query_param("periodStart", "202510151000"))
            .and(query_param("periodEnd", "202510161000"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DOCUMENT))
            .expect(1)
            .mount(&server)
            .await;

        let api = Api::try_new(format!("{}/api", server.uri()).parse()?, "token".to_owned())?;
        let now = Utc.with_ymd_and_hms(2025, 10, 16, 10, 42, 17).unwrap();
        let snapshot = api.fetch_latest_production(now).await?;
        assert_abs_diff_eq!(snapshot.total.0, 5000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_latest_production_unauthorized() -> Result {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = Api::try_new(server.uri().parse()?, "invalid".to_owned())?;
        let result = api.fetch_latest_production(period_end()).await;
        assert!(matches!(
            result,
            Err(Error::SourceFetch { feed: Feed::ActualGeneration, cause: FetchError::Http(_) }),
        ));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_fetch_latest_production_live() -> Result {
        let security_token = std::env::var("ENTSOE_API_TOKEN")?;
        let api = Api::try_new(DEFAULT_BASE_URL.parse()?, security_token)?;
        let snapshot = api.fetch_latest_production(Utc::now()).await?;
        assert!(snapshot.total > Megawatts::ZERO);
        Ok(())
    }
}
