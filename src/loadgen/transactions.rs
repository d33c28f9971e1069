//! Simulated user actions against the Train-Ticket API.
//!
//! Non-200 answers and unparsable bodies never fail a transaction: goose has
//! already recorded the request, and the user simply moves on.

use crate::config::load_profile::LoadProfile;
use crate::domain::train_ticket::{
    ApiEnvelope, ConfigQuery, Contact, LoginData, LoginRequest, OrderRefreshQuery, OrderSummary,
    SeatQuery, TripSummary, CANCEL_PATH, CONFIGS_PATH, CONTACTS_PATH, HIGH_SPEED_TRIPS_LEFT_PATH,
    INSIDE_PAYMENT_PATH, LOGIN_PATH, ORDER_REFRESH_PATH, PRESERVE_PATH, SEATS_LEFT_PATH,
    STATION_ID_PATH, TRAINS_PATH, TRIPS_LEFT_PATH,
};
use crate::loadgen::sampling;
use crate::loadgen::session::{TrainTicketSession, TripChoice};
use goose::goose::GooseResponse;
use goose::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

async fn send<T: Serialize + ?Sized>(
    user: &mut GooseUser,
    method: GooseMethod,
    path: &str,
    name: &str,
    body: Option<&T>,
    token: Option<&str>,
) -> Result<GooseResponse, Box<TransactionError>> {
    let mut request_builder = user.get_request_builder(&method, path)?;
    if let Some(body) = body {
        request_builder = request_builder.json(body);
    }
    if let Some(token) = token {
        request_builder = request_builder.bearer_auth(token);
    }

    let goose_request = GooseRequest::builder()
        .method(method)
        .path(path)
        .name(name)
        .set_request_builder(request_builder)
        .build();

    user.request(goose_request).await
}

/// Envelope of a 200 response with `status == 1`, otherwise `None`.
async fn successful_envelope<T: DeserializeOwned>(
    goose: GooseResponse,
    name: &str,
) -> Option<ApiEnvelope<T>> {
    let response = match goose.response {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("{} request error: {}", name, e);
            return None;
        }
    };

    if response.status().as_u16() != 200 {
        tracing::debug!("{} failed with HTTP {}", name, response.status());
        return None;
    }

    match response.json::<ApiEnvelope<T>>().await {
        Ok(envelope) if envelope.is_success() => Some(envelope),
        Ok(envelope) => {
            tracing::debug!(
                "{} response status != 1: {}",
                name,
                envelope.msg.unwrap_or_default()
            );
            None
        }
        Err(e) => {
            tracing::debug!("{} parse error: {}", name, e);
            None
        }
    }
}

async fn envelope_data<T: DeserializeOwned>(goose: GooseResponse, name: &str) -> Option<T> {
    successful_envelope(goose, name)
        .await
        .and_then(ApiEnvelope::into_data)
}

fn session_token(user: &GooseUser) -> Option<String> {
    user.get_session_data::<TrainTicketSession>()
        .map(|session| session.token.clone())
}

/// Runs once per user before any weighted transaction.
pub async fn login(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let credentials = match sampling::pick_user(&mut rand::rng(), &profile.users) {
        Some(credentials) => credentials.clone(),
        None => return Ok(()),
    };
    let request = LoginRequest {
        username: credentials.username.clone(),
        password: credentials.password.clone(),
        verification_code: profile.verification_code.clone(),
    };

    let goose = send(user, GooseMethod::Post, LOGIN_PATH, "Login", Some(&request), None).await?;

    match envelope_data::<LoginData>(goose, "Login").await {
        Some(LoginData {
            token: Some(token),
            user_id,
            ..
        }) => {
            let preview: String = token.chars().take(30).collect();
            tracing::debug!("Token acquired successfully: {}...", preview);
            user.set_session_data(TrainTicketSession::new(
                token,
                credentials.username,
                user_id,
            ));
        }
        Some(_) => tracing::debug!("Login success but no token in response"),
        None => {}
    }

    Ok(())
}

async fn query_trips(
    user: &mut GooseUser,
    profile: &LoadProfile,
    path: &str,
    name: &str,
    train_type: Option<&str>,
) -> TransactionResult {
    let query = match sampling::trip_query(&mut rand::rng(), profile, train_type) {
        Some(query) => query,
        None => return Ok(()),
    };

    let goose = send(user, GooseMethod::Post, path, name, Some(&query), None).await?;

    // Logged-in users keep a trip around for the booking flow.
    if user.get_session_data::<TrainTicketSession>().is_some() {
        if let Some(trip) = envelope_data::<Vec<TripSummary>>(goose, name)
            .await
            .and_then(|trips| trips.into_iter().next())
        {
            if let Some(session) = user.get_session_data_mut::<TrainTicketSession>() {
                session.last_trip = Some(TripChoice {
                    trip_id: trip.trip_id.to_id_string(),
                    from: trip.start_station.unwrap_or(query.starting_place),
                    to: trip.terminal_station.unwrap_or(query.end_place),
                });
            }
        }
    }

    Ok(())
}

/// Most common action.
pub async fn search_tickets(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    query_trips(user, profile, TRIPS_LEFT_PATH, "Search Tickets", None).await
}

/// G/D trains are served by a separate travel service.
pub async fn query_high_speed_tickets(
    user: &mut GooseUser,
    profile: &LoadProfile,
) -> TransactionResult {
    query_trips(
        user,
        profile,
        HIGH_SPEED_TRIPS_LEFT_PATH,
        "Query High-Speed Tickets",
        Some("G"),
    )
    .await
}

pub async fn view_contacts(user: &mut GooseUser, _profile: &LoadProfile) -> TransactionResult {
    let Some(token) = session_token(user) else {
        return Ok(());
    };

    let goose = send::<()>(
        user,
        GooseMethod::Get,
        CONTACTS_PATH,
        "View Contacts",
        None,
        Some(&token),
    )
    .await?;

    if let Some(contacts) = envelope_data::<Vec<Contact>>(goose, "View Contacts").await {
        if let Some(session) = user.get_session_data_mut::<TrainTicketSession>() {
            session.remember_contacts(&contacts);
        }
    }
    Ok(())
}

pub async fn view_orders(user: &mut GooseUser, _profile: &LoadProfile) -> TransactionResult {
    let Some((token, login_id)) = user
        .get_session_data::<TrainTicketSession>()
        .map(|s| (s.token.clone(), s.login_id.clone()))
    else {
        return Ok(());
    };

    let query = OrderRefreshQuery::for_login(login_id);
    let goose = send(
        user,
        GooseMethod::Post,
        ORDER_REFRESH_PATH,
        "View Orders",
        Some(&query),
        Some(&token),
    )
    .await?;

    if let Some(orders) = envelope_data::<Vec<OrderSummary>>(goose, "View Orders").await {
        if let Some(session) = user.get_session_data_mut::<TrainTicketSession>() {
            session.orders = orders;
        }
    }
    Ok(())
}

pub async fn check_station_info(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let Some(station) = sampling::pick_station(&mut rand::rng(), &profile.stations) else {
        return Ok(());
    };
    let path = format!("{}/{}", STATION_ID_PATH, station);

    send::<()>(user, GooseMethod::Get, &path, "Check Station", None, None).await?;
    Ok(())
}

pub async fn query_train_info(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let Some(train_id) = sampling::random_train_id(&mut rand::rng(), &profile.train_types) else {
        return Ok(());
    };
    let path = format!("{}/{}", TRAINS_PATH, train_id);

    send::<()>(user, GooseMethod::Get, &path, "Query Train Info", None, None).await?;
    Ok(())
}

pub async fn check_config(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let query = ConfigQuery {
        name: profile.config_name.clone(),
    };
    send(user, GooseMethod::Post, CONFIGS_PATH, "Check Config", Some(&query), None).await?;
    Ok(())
}

pub async fn check_seats(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let Some(session) = user.get_session_data::<TrainTicketSession>() else {
        return Ok(());
    };
    let token = session.token.clone();
    let known_trip = session.last_trip.clone();

    let query = {
        let mut rng = rand::rng();
        let trip = match known_trip {
            Some(trip) => Some(trip),
            None => sampling::pick_route(&mut rng, &profile.stations).and_then(|(from, to)| {
                sampling::random_train_id(&mut rng, &profile.train_types)
                    .map(|trip_id| TripChoice { trip_id, from, to })
            }),
        };
        match (trip, sampling::pick_seat_type(&mut rng, &profile.seat_types)) {
            (Some(trip), Some(seat_type)) => SeatQuery {
                travel_date: profile.departure_date.clone(),
                train_number: trip.trip_id,
                start_station: trip.from,
                dest_station: trip.to,
                seat_type,
            },
            _ => return Ok(()),
        }
    };

    send(
        user,
        GooseMethod::Post,
        SEATS_LEFT_PATH,
        "Check Seats",
        Some(&query),
        Some(&token),
    )
    .await?;
    Ok(())
}

pub async fn book_ticket(user: &mut GooseUser, profile: &LoadProfile) -> TransactionResult {
    let Some(session) = user.get_session_data::<TrainTicketSession>() else {
        return Ok(());
    };
    let Some(seat_type) = sampling::pick_seat_type(&mut rand::rng(), &profile.seat_types) else {
        return Ok(());
    };
    let Some(request) = session.preserve_request(seat_type, &profile.departure_date) else {
        tracing::debug!("Book Ticket skipped: no contact or trip known yet");
        return Ok(());
    };
    let token = session.token.clone();

    send(
        user,
        GooseMethod::Post,
        PRESERVE_PATH,
        "Book Ticket",
        Some(&request),
        Some(&token),
    )
    .await?;
    Ok(())
}

pub async fn pay_order(user: &mut GooseUser, _profile: &LoadProfile) -> TransactionResult {
    let Some((token, payment)) = user
        .get_session_data::<TrainTicketSession>()
        .and_then(|s| s.unpaid_order().map(|p| (s.token.clone(), p)))
    else {
        return Ok(());
    };

    let goose = send(
        user,
        GooseMethod::Post,
        INSIDE_PAYMENT_PATH,
        "Pay Order",
        Some(&payment),
        Some(&token),
    )
    .await?;

    if successful_envelope::<serde_json::Value>(goose, "Pay Order")
        .await
        .is_some()
    {
        if let Some(session) = user.get_session_data_mut::<TrainTicketSession>() {
            session.mark_paid(&payment.order_id);
        }
    }
    Ok(())
}

pub async fn cancel_order(user: &mut GooseUser, _profile: &LoadProfile) -> TransactionResult {
    let Some((token, path, order_id)) = user
        .get_session_data::<TrainTicketSession>()
        .and_then(|s| {
            s.cancellable_order().map(|order_id| {
                (
                    s.token.clone(),
                    format!("{}/{}/{}", CANCEL_PATH, order_id, s.account_id()),
                    order_id,
                )
            })
        })
    else {
        return Ok(());
    };

    let goose = send::<()>(
        user,
        GooseMethod::Get,
        &path,
        "Cancel Order",
        None,
        Some(&token),
    )
    .await?;

    if successful_envelope::<serde_json::Value>(goose, "Cancel Order")
        .await
        .is_some()
    {
        if let Some(session) = user.get_session_data_mut::<TrainTicketSession>() {
            session.forget_order(&order_id);
        }
    }
    Ok(())
}
