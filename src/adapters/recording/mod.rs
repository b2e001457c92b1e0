//! Recording adapters that capture interactions to cassettes.

pub mod renderer;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Values that fail to serialize are recorded as `null`; a poisoned lock
/// drops the interaction.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or_default();

    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).unwrap_or_default();
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(e) => log::warn!("dropping {port}::{method} recording: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ok_and_err() {
        let path = std::env::temp_dir().join("placeholder_record_result_test.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "c")));

        let ok: Result<u32, String> = Ok(7);
        let err: Result<u32, String> = Err("boom".into());
        record_result(&recorder, "renderer", "render", &"in", &ok);
        record_result(&recorder, "renderer", "render", &"in", &err);

        assert_eq!(recorder.lock().unwrap().interaction_count(), 2);
    }
}
