//! Client side of the REST API: HTTP wrapper, session handling and the
//! view models the CLI renders.

pub mod api;
pub mod error;
pub mod refresh;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use error::ClientError;
pub use refresh::{RefreshSequencer, RefreshTicket};
pub use session::{FileTokenStore, MemoryTokenStore, SessionContext, SessionState, TokenStore};
pub use views::{DashboardView, ExpensesView, IncomesView, PiggyBanksView, ReportsView};
