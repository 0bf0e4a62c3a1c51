use anyhow::Result;

/// The host is driven by one event at a time, so there's nothing to gain from more threads.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
