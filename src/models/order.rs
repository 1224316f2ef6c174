/// Statuses offered by the order form. The store does not enforce
/// membership; a status is whatever string was last written.
pub const STATUS_OPTIONS: &[&str] = &[
    "pending",
    "accepted",
    "out for delivery",
    "delivered",
    "canceled",
];
