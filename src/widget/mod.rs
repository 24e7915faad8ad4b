pub mod booking;
pub mod collaborators;
pub mod place_page;
pub mod validation;

#[cfg(test)]
mod testing;

pub use booking::{BookingWidget, Redirect, SubmitOutcome, WidgetView};
pub use collaborators::{AuthProvider, ConsoleNotifier, Notifier, StaticAuth, ToastKind};
pub use place_page::{PageView, PlacePage};
pub use validation::ValidationError;
