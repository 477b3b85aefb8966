//! Shared fixtures for model integration tests.
#![allow(dead_code)]

use ctlrules_model::ConfigDocument;

/// A small controller document: six condition slots (C3 free with stale
/// fields), four action slots, three condition groups, two action groups.
pub const PLANT_JSON: &str = r#"{
  "deviceSettings": {"ssid": "plant-net", "apMode": false, "cycleMs": 50, "mqtt": {"port": 1883, "host": "broker"}},
  "ioVariables": [
    {"t": 0, "n": 1, "nm": "start", "m": 0, "s": true, "st": false, "v": 0, "f": false},
    {"t": 0, "n": 2, "nm": "stop", "m": 0, "s": true, "st": true, "v": 0, "f": false},
    {"t": 1, "n": 1, "nm": "pump", "m": 2, "s": true, "st": false, "v": 0, "f": true},
    {"t": 2, "n": 1, "nm": "level", "m": 0, "s": true, "st": false, "v": 512, "f": false},
    {"t": 3, "n": 1, "nm": "count", "m": 0, "s": true, "st": false, "v": 3, "f": false},
    {"t": 4, "n": 1, "nm": "delay", "m": 3, "s": false, "st": false, "v": 0, "f": false}
  ],
  "conditions": [
    {"cn": 1, "t": 0, "tn": 1, "cp": 0, "v": 0, "s": true},
    {"cn": 2, "t": 2, "tn": 1, "cp": 4, "v": 600, "s": true},
    {"cn": 3, "t": 1, "tn": 1, "cp": 1, "v": 0, "s": false},
    {"cn": 4, "t": 0, "tn": 0, "cp": 0, "v": 0, "s": false},
    {"cn": 5, "t": 3, "tn": 1, "cp": 2, "v": 3, "s": true},
    {"cn": 6, "t": 0, "tn": 0, "cp": 0, "v": 0, "s": false}
  ],
  "actions": [
    {"an": 1, "t": 1, "tn": 1, "a": 0, "v": 0, "s": true},
    {"an": 2, "t": 3, "tn": 1, "a": 3, "v": 1, "s": true},
    {"an": 3, "t": 0, "tn": 0, "a": 0, "v": 0, "s": false},
    {"an": 4, "t": 0, "tn": 0, "a": 0, "v": 0, "s": false}
  ],
  "conditionGroups": [
    {"n": 1, "l": 0, "ca": [1, 2, 0, 0, 0, 0, 0, 0, 0, 0], "s": true},
    {"n": 2, "l": 1, "ca": [5, 1, 0, 0, 0, 0, 0, 0, 0, 0], "s": true},
    {"n": 3, "l": 0, "ca": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "s": false}
  ],
  "actionGroups": [
    {"n": 1, "l": 0, "aa": [1, 2, 0, 0, 0, 0, 0, 0, 0, 0], "s": true},
    {"n": 2, "l": 0, "aa": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "s": false}
  ]
}"#;

pub fn plant() -> ConfigDocument {
    ConfigDocument::from_json(PLANT_JSON).expect("decode plant fixture")
}

/// Encode and re-parse as a generic JSON value.
pub fn encoded(document: &ConfigDocument) -> serde_json::Value {
    let text = document.to_json().expect("encode document");
    serde_json::from_str(&text).expect("parse encoded document")
}
