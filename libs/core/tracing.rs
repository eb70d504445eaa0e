use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Install the global subscriber, verbosity is read from `RUST_LOG` and
/// defaults to warnings
pub fn setup() -> eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    build_subscriber(env_filter, std::io::stderr).try_init()?;

    Ok(())
}

fn build_subscriber<W>(env_filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .without_time()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(ErrorLayer::default())
}
