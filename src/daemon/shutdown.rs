use tokio::select;
use tokio_util::sync::CancellationToken;

/// Cancels `cancelation` when the process receives Ctrl-C. Also returns once someone else cancels
/// it, which is the usual way out: the browser closes stdin when it's done with the host.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
