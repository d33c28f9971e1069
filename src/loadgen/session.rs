use crate::domain::train_ticket::{
    Contact, OrderSummary, PaymentRequest, PreserveRequest, ORDER_STATUS_NOT_PAID,
    ORDER_STATUS_PAID,
};

/// A trip seen in search results, kept for the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripChoice {
    pub trip_id: String,
    pub from: String,
    pub to: String,
}

/// Per-user state; present only after a successful login.
#[derive(Debug, Clone, Default)]
pub struct TrainTicketSession {
    pub token: String,
    pub login_id: String,
    pub user_id: Option<String>,
    pub contact_id: Option<String>,
    pub last_trip: Option<TripChoice>,
    pub orders: Vec<OrderSummary>,
}

impl TrainTicketSession {
    pub fn new(token: impl Into<String>, login_id: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            login_id: login_id.into(),
            user_id,
            ..Self::default()
        }
    }

    /// Account id expected by the order and cancel services.
    pub fn account_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.login_id)
    }

    pub fn remember_contacts(&mut self, contacts: &[Contact]) {
        let own = contacts
            .iter()
            .find(|c| c.account_id.as_deref() == self.user_id.as_deref() && self.user_id.is_some());
        if let Some(contact) = own.or_else(|| contacts.first()) {
            self.contact_id = Some(contact.id.clone());
        }
    }

    pub fn preserve_request(&self, seat_type: i32, date: &str) -> Option<PreserveRequest> {
        let contacts_id = self.contact_id.clone()?;
        let trip = self.last_trip.as_ref()?;
        Some(PreserveRequest {
            account_id: self.account_id().to_string(),
            contacts_id,
            trip_id: trip.trip_id.clone(),
            seat_type,
            date: date.to_string(),
            from: trip.from.clone(),
            to: trip.to.clone(),
            assurance: 0,
            food_type: 0,
        })
    }

    pub fn unpaid_order(&self) -> Option<PaymentRequest> {
        self.orders
            .iter()
            .find(|o| o.status == ORDER_STATUS_NOT_PAID)
            .map(|o| PaymentRequest {
                order_id: o.id.clone(),
                trip_id: o.train_number.clone().unwrap_or_default(),
            })
    }

    pub fn mark_paid(&mut self, order_id: &str) {
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == order_id) {
            order.status = ORDER_STATUS_PAID;
        }
    }

    /// Unpaid or paid orders can still be cancelled.
    pub fn cancellable_order(&self) -> Option<String> {
        self.orders
            .iter()
            .find(|o| o.status == ORDER_STATUS_NOT_PAID || o.status == ORDER_STATUS_PAID)
            .map(|o| o.id.clone())
    }

    pub fn forget_order(&mut self, order_id: &str) {
        self.orders.retain(|o| o.id != order_id);
    }
}
