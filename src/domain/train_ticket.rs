//! Request and response shapes of the Train-Ticket REST API.
//!
//! Every endpoint answers with the same `{status, msg, data}` envelope where
//! `status == 1` means success.

use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/api/v1/users/login";
pub const TRIPS_LEFT_PATH: &str = "/api/v1/travelservice/trips/left";
pub const HIGH_SPEED_TRIPS_LEFT_PATH: &str = "/api/v1/travel2service/trips/left";
pub const CONTACTS_PATH: &str = "/api/v1/contactservice/contacts";
pub const ORDER_REFRESH_PATH: &str = "/api/v1/orderservice/order/refresh";
pub const STATION_ID_PATH: &str = "/api/v1/stationservice/stations/id";
pub const TRAINS_PATH: &str = "/api/v1/trainservice/trains";
pub const CONFIGS_PATH: &str = "/api/v1/configservice/configs";
pub const SEATS_LEFT_PATH: &str = "/api/v1/seatservice/seats/left_tickets";
pub const PRESERVE_PATH: &str = "/api/v1/preserveservice/preserve";
pub const INSIDE_PAYMENT_PATH: &str = "/api/v1/inside_pay_service/inside_payment";
pub const CANCEL_PATH: &str = "/api/v1/cancelservice/cancel";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: i32,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == 1
    }

    /// Payload of a successful response.
    pub fn into_data(self) -> Option<T> {
        if self.is_success() {
            self.data
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub verification_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub starting_place: String,
    pub end_place: String,
    pub departure_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TripId {
    Plain(String),
    Parts {
        #[serde(rename = "type")]
        train_type: String,
        number: String,
    },
}

impl TripId {
    pub fn to_id_string(&self) -> String {
        match self {
            TripId::Plain(id) => id.clone(),
            TripId::Parts { train_type, number } => format!("{}{}", train_type, number),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub trip_id: TripId,
    #[serde(default)]
    pub start_station: Option<String>,
    #[serde(default)]
    pub terminal_station: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRefreshQuery {
    pub login_id: String,
    pub enable_state_query: bool,
    pub enable_travel_date_query: bool,
    pub enable_bought_date_query: bool,
}

impl OrderRefreshQuery {
    pub fn for_login(login_id: impl Into<String>) -> Self {
        Self {
            login_id: login_id.into(),
            enable_state_query: false,
            enable_travel_date_query: false,
            enable_bought_date_query: false,
        }
    }
}

/// Order states used by the booking flow.
pub const ORDER_STATUS_NOT_PAID: i32 = 0;
pub const ORDER_STATUS_PAID: i32 = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub train_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigQuery {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatQuery {
    pub travel_date: String,
    pub train_number: String,
    pub start_station: String,
    pub dest_station: String,
    pub seat_type: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreserveRequest {
    pub account_id: String,
    pub contacts_id: String,
    pub trip_id: String,
    pub seat_type: i32,
    pub date: String,
    pub from: String,
    pub to: String,
    pub assurance: i32,
    pub food_type: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: String,
    pub trip_id: String,
}
