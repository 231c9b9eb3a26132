#![doc = include_str!("../.crate-docs.md")]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod app;
pub mod dispatch;
pub mod error;
mod names;
pub mod signal;
pub mod styles;
pub mod widget;

pub use names::Name;

pub use self::app::App;
pub use self::dispatch::{Dispatcher, EmitSender, Registration};
pub use self::error::{AggregateCallbackError, EmitError, InvalidWidgetError, QueueError};
pub use self::signal::{Payload, Signal};
pub use self::widget::{AnyWidget, Widget, WidgetId, WidgetKind};

/// Installs a global `tracing` Subscriber that honors `RUST_LOG`.
///
/// Does nothing if a subscriber is already installed, or if the
/// `tracing-output` feature is disabled.
pub fn initialize_tracing() {
    #[cfg(feature = "tracing-output")]
    {
        use tracing::Level;
        use tracing_subscriber::filter::LevelFilter;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        use tracing_subscriber::EnvFilter;

        #[cfg(debug_assertions)]
        const MAX_LEVEL: Level = Level::INFO;
        #[cfg(not(debug_assertions))]
        const MAX_LEVEL: Level = Level::ERROR;

        let _result = tracing_subscriber::fmt::fmt()
            .with_max_level(Level::TRACE)
            .finish()
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::from_level(MAX_LEVEL).into())
                    .from_env_lossy(),
            )
            .try_init();
    }
}
