// Commands accepted by the mutation use cases
//
// These are built by the HTTP layer after schema validation; the engine
// still re-checks the quantity band defensively.

#[derive(Debug, Clone)]
pub struct ReserveCommand {
    pub user_id: String,
    pub item_id: String,
    pub qty: i64,
}

#[derive(Debug, Clone)]
pub struct ConfirmCommand {
    pub user_id: String,
    pub reservation_id: String,
}

#[derive(Debug, Clone)]
pub struct CancelCommand {
    pub user_id: String,
    pub reservation_id: String,
}
