use leptos::prelude::*;
use lingua_frontend::{App, BootFailure, boot};

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    match boot() {
        Ok(shell) => mount_to_body(move || view! { <App shell=shell /> }),
        Err(err) => {
            log::error!("[Boot] {}", err);
            let reason = err.to_string();
            mount_to_body(move || view! { <BootFailure reason=reason /> });
        }
    }
}
