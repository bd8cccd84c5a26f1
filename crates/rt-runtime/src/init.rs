//! Wiring to the host allocator: a single process-wide [`Allocator`]
//! instance every core component allocates through.

use std::sync::OnceLock;

use rt_alloc::{AllocConfig, Allocator, FgcError};

static ALLOCATOR: OnceLock<Allocator> = OnceLock::new();

/// Starts the process-wide allocator with the given configuration. Only the
/// first call takes effect — later calls are no-ops, matching the
/// once-per-process lifetime `rt_alloc::Runtime::start` expects.
pub fn init(config: AllocConfig) -> Result<(), FgcError> {
    if ALLOCATOR.get().is_some() {
        log::debug!("rt-runtime allocator already initialized; ignoring re-init");
        return Ok(());
    }

    let allocator = Allocator::new(config)?;
    allocator.start()?;
    log::info!("rt-runtime allocator started");
    let _ = ALLOCATOR.set(allocator);
    Ok(())
}

/// The process-wide allocator, starting it with a default configuration on
/// first access if [`init`] was never called explicitly.
pub fn runtime() -> &'static Allocator {
    ALLOCATOR.get_or_init(|| {
        let allocator = Allocator::new(AllocConfig::default()).expect("default allocator configuration is valid");
        allocator.start().expect("allocator starts from a fresh configuration");
        log::info!("rt-runtime allocator started with default configuration");
        allocator
    })
}
