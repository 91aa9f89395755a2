//! KinshipScanner: JS bindings over the native extractor

use wasm_bindgen::prelude::*;

use super::extractor::{Extractor, ExtractorConfig};

/// Browser-facing wrapper around [`Extractor`]
#[wasm_bindgen]
pub struct KinshipScanner {
    inner: Extractor,
}

#[wasm_bindgen]
impl KinshipScanner {
    /// `config` may be `null`/`undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<KinshipScanner, JsValue> {
        let config: ExtractorConfig = if config.is_null() || config.is_undefined() {
            ExtractorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let inner = Extractor::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(KinshipScanner { inner })
    }

    /// Returns `{ relationships, stats }`
    #[wasm_bindgen(js_name = scan)]
    pub fn scan(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.inner.scan(text);
        serde_wasm_bindgen::to_value(&result).map_err(|e| {
            web_sys::console::error_1(&JsValue::from_str(&format!("[KinshipScanner] serialization failed: {}", e)));
            JsValue::from_str(&format!("Serialization error: {}", e))
        })
    }

    #[wasm_bindgen(js_name = patternNames)]
    pub fn pattern_names(&self) -> Vec<String> {
        self.inner.pattern_names().into_iter().map(String::from).collect()
    }
}
