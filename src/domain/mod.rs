// Domain layer: models and ports. Train-Ticket payloads live in `train_ticket`.

pub mod model;
pub mod ports;
pub mod train_ticket;
