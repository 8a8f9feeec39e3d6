//! Operation methods, one per API operation.
//!
//! Each method validates its preconditions, builds the fixed GraphQL
//! operation text with the supplied variables, runs the request pipeline,
//! and decodes the envelope into the operation's typed result.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;
use serde_json::{json, Value};

use crate::auth::Authentication;
use crate::client::{FrankEnergie, GraphQlQuery};
use crate::error::FrankEnergieError;
use crate::models::{
    Decodable, EnergyConsumption, EnodeChargers, Invoices, MarketPrices, Me, MonthSummary,
    PeriodUsageAndCosts, SmartBatteries, SmartBatteryDetails, SmartBatterySessions, User,
    UserSites,
};

const LOGIN_QUERY: &str = "
    mutation Login($email: String!, $password: String!) {
        login(email: $email, password: $password) {
            authToken
            refreshToken
        }
        version
        __typename
    }
";

const RENEW_TOKEN_QUERY: &str = "
    mutation RenewToken($authToken: String!, $refreshToken: String!) {
        renewToken(authToken: $authToken, refreshToken: $refreshToken) {
            authToken
            refreshToken
        }
    }
";

const METER_READINGS_QUERY: &str = "
    query ActualAndExpectedMeterReadings($siteReference: String!) {
        completenessPercentage
        actualMeterReadings {
            date
            consumptionKwh
        }
        expectedMeterReadings {
            date
            consumptionKwh
        }
    }
";

const MONTH_SUMMARY_QUERY: &str = "
    query MonthSummary($siteReference: String!) {
        monthSummary(siteReference: $siteReference) {
            _id
            actualCostsUntilLastMeterReadingDate
            expectedCostsUntilLastMeterReadingDate
            expectedCosts
            lastMeterReadingDate
            meterReadingDayCompleteness
            gasExcluded
            __typename
        }
        version
        __typename
    }
";

const ENODE_CHARGERS_QUERY: &str = "
    query EnodeChargers {
        enodeChargers {
            id
            isReachable
            lastSeen
            chargeState {
                isCharging
                isPluggedIn
                chargeRate
                batteryLevel
            }
            information {
                brand
                model
                year
            }
        }
    }
";

const INVOICES_QUERY: &str = "
    query Invoices($siteReference: String!) {
        invoices(siteReference: $siteReference) {
            allPeriodsInvoices {
                StartDate
                PeriodDescription
                TotalAmount
            }
            previousPeriodInvoice {
                StartDate
                PeriodDescription
                TotalAmount
            }
            currentPeriodInvoice {
                StartDate
                PeriodDescription
                TotalAmount
            }
            upcomingPeriodInvoice {
                StartDate
                PeriodDescription
                TotalAmount
            }
        }
    }
";

const ME_QUERY: &str = "
    query Me($siteReference: String) {
        me {
            ...UserFields
        }
    }
    fragment UserFields on User {
        id
        email
        firstName
        lastName
        countryCode
        status
        reference
        advancedPaymentAmount
        treesCount
        hasCO2Compensation
    }
";

const USER_SITES_QUERY: &str = "
    query UserSites {
        userSites {
            reference
            status
            segments
            address {
                street
                houseNumber
                zipCode
                city
            }
            deliveryStartDate
            deliveryEndDate
            firstMeterReadingDate
            lastMeterReadingDate
        }
    }
";

const USER_COUNTRY_QUERY: &str = "
    query UserCountry {
        me {
            countryCode
        }
    }
";

const MARKET_PRICES_QUERY: &str = "
    query MarketPrices($startDate: Date!, $endDate: Date!) {
        marketPricesElectricity(startDate: $startDate, endDate: $endDate) {
            from
            till
            marketPrice
            marketPriceTax
            sourcingMarkupPrice
            energyTaxPrice
            perUnit
        }
        marketPricesGas(startDate: $startDate, endDate: $endDate) {
            from
            till
            marketPrice
            marketPriceTax
            sourcingMarkupPrice
            energyTaxPrice
            perUnit
        }
    }
";

const USER_PRICES_QUERY: &str = "
    query MarketPrices($date: String!, $siteReference: String!) {
        customerMarketPrices(date: $date, siteReference: $siteReference) {
            electricityPrices {
                from
                till
                marketPrice
                marketPriceTax
                sourcingMarkupPrice
                energyTaxPrice
                perUnit
            }
            gasPrices {
                from
                till
                marketPrice
                marketPriceTax
                sourcingMarkupPrice
                energyTaxPrice
                perUnit
            }
        }
    }
";

const BE_PRICES_QUERY: &str = "
    query MarketPrices($date: String!) {
        marketPrices(date: $date) {
            electricityPrices {
                from
                till
                marketPrice
                marketPriceTax
                sourcingMarkupPrice
                energyTaxPrice
                perUnit
            }
            gasPrices {
                from
                till
                marketPrice
                marketPriceTax
                sourcingMarkupPrice
                energyTaxPrice
                perUnit
            }
        }
    }
";

const PERIOD_USAGE_AND_COSTS_QUERY: &str = "
    query PeriodUsageAndCosts($date: String!, $siteReference: String!) {
        periodUsageAndCosts(date: $date, siteReference: $siteReference) {
            _id
            electricity {
                usageTotal
                costsTotal
                unit
                items {
                    date
                    from
                    till
                    usage
                    costs
                    unit
                }
            }
            gas {
                usageTotal
                costsTotal
                unit
                items {
                    date
                    from
                    till
                    usage
                    costs
                    unit
                }
            }
            feedIn {
                usageTotal
                costsTotal
                unit
                items {
                    date
                    from
                    till
                    usage
                    costs
                    unit
                }
            }
        }
    }
";

const SMART_BATTERIES_QUERY: &str = "
    query SmartBatteries {
        smartBatteries {
            id
            brand
            capacity
            externalReference
            maxChargePower
            maxDischargePower
            provider
            createdAt
            updatedAt
        }
    }
";

const SMART_BATTERY_QUERY: &str = "
    query SmartBattery($deviceId: String!) {
        smartBattery(deviceId: $deviceId) {
            id
            brand
            capacity
            externalReference
            maxChargePower
            maxDischargePower
            provider
            createdAt
            updatedAt
        }
        smartBatterySummary(deviceId: $deviceId) {
            lastKnownStateOfCharge
            lastKnownStatus
            lastUpdate
            totalResult
        }
    }
";

const SMART_BATTERY_SESSIONS_QUERY: &str = "
    query SmartBatterySessions($startDate: String!, $endDate: String!, $deviceId: String!) {
        smartBatterySessions(startDate: $startDate, endDate: $endDate, deviceId: $deviceId) {
            deviceId
            periodStartDate
            periodEndDate
            periodTradeIndex
            periodTradingResult
            periodTotalResult
            periodImbalanceResult
            periodEpexResult
            periodFrankSlim
            sessions {
                date
                tradingResult
                cumulativeTradingResult
                status
            }
        }
    }
";

const INTROSPECTION_QUERY: &str = "
    query IntrospectionQuery {
        __schema {
            types {
                name
                fields {
                    name
                }
            }
        }
    }
";

impl FrankEnergie {
    /// Logs in and stores the returned credentials on the client.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::InvalidInput`] when username or password is
    /// empty, [`FrankEnergieError::Auth`] when the server rejects the
    /// credentials.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Authentication, FrankEnergieError> {
        if username.is_empty() || password.is_empty() {
            return Err(FrankEnergieError::InvalidInput(
                "Username and password must be provided.".to_string(),
            ));
        }

        let query = GraphQlQuery::new(
            LOGIN_QUERY,
            "Login",
            Some(json!({"email": username, "password": password})),
        )?;

        let envelope = self.send(&query, None).await?;
        let auth = Authentication::from_response(&envelope)?;
        self.set_authentication(auth.clone());
        Ok(auth)
    }

    /// Renews the token pair and stores the fresh credentials.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without existing credentials,
    /// [`FrankEnergieError::Auth`] when the renewal is rejected.
    pub async fn renew_token(&mut self) -> Result<Authentication, FrankEnergieError> {
        let current = self.require_auth()?.clone();
        let variables = json!({
            "authToken": current.auth_token,
            "refreshToken": current.refresh_token,
        });

        let query = GraphQlQuery::new(RENEW_TOKEN_QUERY, "RenewToken", Some(variables))?;

        let envelope = self.send(&query, None).await?;
        let auth = Authentication::from_response(&envelope)?;
        self.set_authentication(auth.clone());
        Ok(auth)
    }

    /// Retrieves the actual and expected meter readings for a site.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn meter_readings(
        &self,
        site_reference: &str,
    ) -> Result<EnergyConsumption, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            METER_READINGS_QUERY,
            "ActualAndExpectedMeterReadings",
            Some(json!({"siteReference": site_reference})),
        )?;

        let envelope = self.send(&query, None).await?;
        EnergyConsumption::decode(&envelope)
    }

    /// Retrieves the month summary for a site.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; any other
    /// failure is wrapped in [`FrankEnergieError::Auth`].
    pub async fn month_summary(
        &self,
        site_reference: &str,
    ) -> Result<MonthSummary, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            MONTH_SUMMARY_QUERY,
            "MonthSummary",
            Some(json!({"siteReference": site_reference})),
        )?;

        let summary = async {
            let envelope = self.send(&query, None).await?;
            MonthSummary::decode(&envelope)
        }
        .await;

        summary.map_err(|err| {
            FrankEnergieError::Auth(format!("Failed to fetch month summary: {err}"))
        })
    }

    /// Lists the chargers connected through the Enode integration.
    ///
    /// Best-effort: an unauthenticated client or any pipeline or decode
    /// failure yields an empty result instead of an error, so an optional
    /// feature cannot break a composite fetch.
    pub async fn enode_chargers(&self, site_reference: &str) -> EnodeChargers {
        if self.require_auth().is_err() {
            tracing::debug!("skipping Enode chargers: not authenticated");
            return EnodeChargers::default();
        }

        let result = async {
            let query = GraphQlQuery::new(
                ENODE_CHARGERS_QUERY,
                "EnodeChargers",
                Some(json!({"siteReference": site_reference})),
            )?;
            let envelope = self.send(&query, None).await?;
            EnodeChargers::decode(&envelope)
        }
        .await;

        match result {
            Ok(chargers) => {
                tracing::debug!(count = chargers.chargers.len(), "Enode chargers found");
                chargers
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch Enode chargers");
                EnodeChargers::default()
            }
        }
    }

    /// Retrieves the invoices for a site.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn invoices(&self, site_reference: &str) -> Result<Invoices, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            INVOICES_QUERY,
            "Invoices",
            Some(json!({"siteReference": site_reference})),
        )?;

        let envelope = self.send(&query, None).await?;
        Invoices::decode(&envelope)
    }

    /// Retrieves the account summary.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn me(&self, site_reference: Option<&str>) -> Result<Me, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            ME_QUERY,
            "Me",
            Some(json!({"siteReference": site_reference})),
        )?;

        let envelope = self.send(&query, None).await?;
        Me::decode(&envelope)
    }

    /// Retrieves the full account details from the `Me` operation.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn user(&self, site_reference: Option<&str>) -> Result<User, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            ME_QUERY,
            "Me",
            Some(json!({"siteReference": site_reference})),
        )?;

        let envelope = self.send(&query, None).await?;
        User::decode(&envelope)
    }

    /// Retrieves the delivery sites of the account.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn user_sites(&self) -> Result<UserSites, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(USER_SITES_QUERY, "UserSites", None)?;

        let envelope = self.send(&query, None).await?;
        UserSites::decode(&envelope)
    }

    /// Retrieves the account's country code.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn user_country(&self) -> Result<Me, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(USER_COUNTRY_QUERY, "UserCountry", None)?;

        let envelope = self.send(&query, None).await?;
        Me::decode(&envelope)
    }

    /// Retrieves the general market prices for a date range.
    ///
    /// Defaults to today through tomorrow. No authentication required.
    ///
    /// # Errors
    ///
    /// Pipeline and decode failures propagate.
    pub async fn prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<MarketPrices, FrankEnergieError> {
        let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end_date = end_date.unwrap_or_else(|| start_date + Duration::days(1));

        let query = GraphQlQuery::new(
            MARKET_PRICES_QUERY,
            "MarketPrices",
            Some(json!({
                "startDate": start_date.to_string(),
                "endDate": end_date.to_string(),
            })),
        )?;

        let envelope = self.send(&query, None).await?;
        MarketPrices::decode(&envelope)
    }

    /// Retrieves the customer market prices for a site and date.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn user_prices(
        &self,
        site_reference: &str,
        start_date: NaiveDate,
    ) -> Result<MarketPrices, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(
            USER_PRICES_QUERY,
            "MarketPrices",
            Some(json!({
                "date": start_date.to_string(),
                "siteReference": site_reference,
            })),
        )?;

        let envelope = self.send(&query, None).await?;
        MarketPrices::from_user_envelope(&envelope)
    }

    /// Retrieves the Belgian market prices for a date.
    ///
    /// Routed through the `x-country: BE` header; defaults to today. No
    /// authentication required.
    ///
    /// # Errors
    ///
    /// Pipeline and decode failures propagate.
    pub async fn be_prices(
        &self,
        start_date: Option<NaiveDate>,
    ) -> Result<MarketPrices, FrankEnergieError> {
        let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());

        let headers = HashMap::from([("x-country".to_string(), "BE".to_string())]);

        let query = GraphQlQuery::new(
            BE_PRICES_QUERY,
            "MarketPrices",
            Some(json!({"date": start_date.to_string()})),
        )?;

        let envelope = self.send(&query, Some(headers)).await?;
        MarketPrices::from_be_envelope(&envelope)
    }

    /// Retrieves usage and costs for a period and site, the invoice-grade
    /// market-price-plus breakdown.
    ///
    /// `period` accepts `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`; a full date must
    /// be a real calendar date and must not be in the future.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::InvalidInput`] for an empty site reference or a
    /// malformed period, [`FrankEnergieError::AuthRequired`] without
    /// credentials; any other failure is wrapped in
    /// [`FrankEnergieError::Auth`].
    pub async fn period_usage_and_costs(
        &self,
        site_reference: &str,
        period: &str,
    ) -> Result<PeriodUsageAndCosts, FrankEnergieError> {
        if site_reference.is_empty() {
            return Err(FrankEnergieError::InvalidInput(
                "The site reference must not be empty.".to_string(),
            ));
        }
        validate_period_format(period)?;
        self.require_auth()?;

        let query = GraphQlQuery::new(
            PERIOD_USAGE_AND_COSTS_QUERY,
            "PeriodUsageAndCosts",
            Some(json!({
                "siteReference": site_reference,
                "date": period,
            })),
        )?;

        let usage = async {
            let envelope = self.send(&query, None).await?;
            PeriodUsageAndCosts::decode(&envelope)
        }
        .await;

        usage.map_err(|err| {
            tracing::error!(error = %err, site_reference, period, "failed to fetch usage and costs");
            FrankEnergieError::Auth(
                "Failed to fetch usage and costs for the requested period.".to_string(),
            )
        })
    }

    /// Lists the smart batteries of the account.
    ///
    /// Best-effort on the response side: an error-carrying or malformed
    /// envelope yields an empty list, so an optional feature cannot break a
    /// composite fetch. Transport failures still propagate.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline
    /// failures propagate.
    pub async fn smart_batteries(&self) -> Result<SmartBatteries, FrankEnergieError> {
        self.require_auth()?;

        let query = GraphQlQuery::new(SMART_BATTERIES_QUERY, "SmartBatteries", None)?;

        let envelope = self.send(&query, None).await?;

        // Fail-open leftovers from the classifier mean no usable payload.
        if envelope.get("errors").is_some() {
            tracing::error!("error response for 'smartBatteries', returning empty result");
            return Ok(SmartBatteries::default());
        }

        match SmartBatteries::decode(&envelope) {
            Ok(batteries) => Ok(batteries),
            Err(err) => {
                tracing::error!(error = %err, "failed to parse smart batteries");
                Ok(SmartBatteries::default())
            }
        }
    }

    /// Retrieves the details and telemetry summary of one battery.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::InvalidInput`] for an empty device id,
    /// [`FrankEnergieError::AuthRequired`] without credentials,
    /// [`FrankEnergieError::Auth`] for an incomplete response.
    pub async fn smart_battery_details(
        &self,
        device_id: &str,
    ) -> Result<SmartBatteryDetails, FrankEnergieError> {
        self.require_auth()?;

        if device_id.is_empty() {
            return Err(FrankEnergieError::InvalidInput(
                "Missing required device_id for smart_battery_details".to_string(),
            ));
        }

        let query = GraphQlQuery::new(
            SMART_BATTERY_QUERY,
            "SmartBattery",
            Some(json!({"deviceId": device_id})),
        )?;

        let envelope = self.send(&query, None).await?;

        let data = envelope.get("data");
        let has_both = data.is_some_and(|d| {
            d.get("smartBattery").is_some() && d.get("smartBatterySummary").is_some()
        });
        if !has_both {
            tracing::debug!("incomplete response data for 'smartBattery' or 'smartBatterySummary'");
            return Err(FrankEnergieError::Auth(
                "Incomplete response data for smart battery details".to_string(),
            ));
        }

        SmartBatteryDetails::decode(&envelope)
    }

    /// Lists the trading sessions of one battery over a date range.
    ///
    /// # Errors
    ///
    /// [`FrankEnergieError::InvalidInput`] for an empty device id,
    /// [`FrankEnergieError::AuthRequired`] without credentials; pipeline and
    /// decode failures propagate.
    pub async fn smart_battery_sessions(
        &self,
        device_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<SmartBatterySessions, FrankEnergieError> {
        self.require_auth()?;

        if device_id.is_empty() {
            return Err(FrankEnergieError::InvalidInput(
                "Missing required device_id for smart_battery_sessions".to_string(),
            ));
        }

        let query = GraphQlQuery::new(
            SMART_BATTERY_SESSIONS_QUERY,
            "SmartBatterySessions",
            Some(json!({
                "deviceId": device_id,
                "startDate": start_date.to_string(),
                "endDate": end_date.to_string(),
            })),
        )?;

        let envelope = self.send(&query, None).await?;
        SmartBatterySessions::decode(&envelope)
    }

    /// Fetches the schema outline through the introspection utility, with
    /// the shorter timeout.
    ///
    /// # Errors
    ///
    /// Pipeline failures propagate.
    pub async fn introspect_schema(&self) -> Result<Value, FrankEnergieError> {
        let query = GraphQlQuery::new(INTROSPECTION_QUERY, "IntrospectionQuery", None)?;
        self.send_with_timeout(&query, None, self.introspection_timeout())
            .await
    }
}

static PERIOD_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Checks that a date is not after the current UTC date.
pub(crate) fn validate_not_future(date: NaiveDate) -> Result<(), FrankEnergieError> {
    if date > Utc::now().date_naive() {
        return Err(FrankEnergieError::InvalidInput(
            "The date must not be in the future.".to_string(),
        ));
    }
    Ok(())
}

/// Checks a period string against `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`; a full
/// date must also be a real, non-future calendar date.
pub(crate) fn validate_period_format(period: &str) -> Result<(), FrankEnergieError> {
    let pattern = PERIOD_PATTERN
        .get_or_init(|| Regex::new(r"^\d{4}(-\d{2}){0,2}$").expect("period pattern is valid"));

    if !pattern.is_match(period) {
        return Err(FrankEnergieError::InvalidInput(
            "The period must be formatted as 'YYYY', 'YYYY-MM' or 'YYYY-MM-DD'.".to_string(),
        ));
    }

    if period.len() == 10 {
        let date = NaiveDate::parse_from_str(period, "%Y-%m-%d").map_err(|err| {
            FrankEnergieError::InvalidInput(format!("The period is not a valid date: {err}"))
        })?;
        validate_not_future(date)?;
    }

    Ok(())
}
