/// Wall-clock seconds since the UNIX epoch, used for layer and history timestamps.
pub fn now_secs() -> f64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }

    // `time_origin` is epoch-based, `now` is relative to it
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|perf| (perf.time_origin() + perf.now()) / 1000.0)
            .unwrap_or(0.0)
    }
}
