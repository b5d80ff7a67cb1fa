//! Tracy profiler setup for streaming spans.

use tracing_subscriber::prelude::*;
use tracing_tracy::TracyLayer;

/// Installs a Tracy subscriber so streaming systems and mesh builds show up
/// as spans.
///
/// Call once in `main()` before `App::run()`, and disable `LogPlugin` so it
/// does not install a second global subscriber.
pub fn init_tracy() {
  tracing_subscriber::registry()
    .with(TracyLayer::default())
    .init();
}
