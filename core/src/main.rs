use forum_core::{ApiError, ForumClient, DEFAULT_HOST};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> Result<(), ApiError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ForumClient::new(&format!("{DEFAULT_HOST}/"));
    let posts = client.get_posts(None)?;
    let json = serde_json::to_string_pretty(&posts).expect("posts hold only integers and strings");
    println!("{json}");
    Ok(())
}
