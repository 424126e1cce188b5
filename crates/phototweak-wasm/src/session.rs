//! WASM bindings for an edit session.
//!
//! Layout snapshots, configs and export parameters cross the boundary as
//! plain JavaScript objects. Timestamps are optional: when omitted, the
//! current `Date.now()` is used.

use crate::{from_js, to_js};
use phototweak_core::crop::contained_in;
use phototweak_core::{
    AspectPreset, EditorConfig, EditorSession, ExportParameters, GesturePhase, Point, Rect, Size,
    Vector2,
};
use wasm_bindgen::prelude::*;

fn now(now_ms: Option<f64>) -> f64 {
    now_ms.unwrap_or_else(js_sys::Date::now)
}

fn core_error(err: phototweak_core::GeometryError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parse a gesture phase name as sent by the host.
pub(crate) fn parse_phase(phase: &str) -> Option<GesturePhase> {
    match phase.to_ascii_lowercase().as_str() {
        "began" | "begin" | "start" => Some(GesturePhase::Began),
        "changed" | "change" | "move" => Some(GesturePhase::Changed),
        "ended" | "end" => Some(GesturePhase::Ended),
        _ => None,
    }
}

/// A crop/rotate edit session.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new JsEditorSession(4000, 3000, 400, 800, { min_side_length: 80 });
/// session.begin_crop_drag(x, y);
/// const layout = session.update_crop_drag(dx, dy);
/// session.end_crop_drag();
/// // later, from an animation frame
/// const settled = session.tick();
/// const params = session.commit();
/// ```
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

impl JsEditorSession {
    pub(crate) fn with_config(
        image_size: Size,
        editor_size: Size,
        config: EditorConfig,
    ) -> Result<Self, phototweak_core::GeometryError> {
        Ok(Self {
            inner: EditorSession::new(image_size, editor_size, config)?,
        })
    }
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Start a session. `config` may be omitted or partial; missing fields
    /// take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        image_width: f64,
        image_height: f64,
        editor_width: f64,
        editor_height: f64,
        config: JsValue,
    ) -> Result<JsEditorSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            from_js(config, "Invalid editor config")?
        };
        Self::with_config(
            Size::new(image_width, image_height),
            Size::new(editor_width, editor_height),
            config,
        )
        .map_err(core_error)
    }

    /// Current layout without any transition.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.layout_snapshot())
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    #[wasm_bindgen(getter)]
    pub fn rotated_count(&self) -> u8 {
        self.inner.rotated_count()
    }

    #[wasm_bindgen(getter)]
    pub fn settle_pending(&self) -> bool {
        self.inner.settle_pending()
    }

    /// Validate crop drags with a JS callback receiving the candidate
    /// `{x, y, width, height}`. Anything but `false` accepts.
    pub fn set_can_change_to(&mut self, callback: js_sys::Function) {
        self.inner.set_can_change_to(move |rect: &Rect| {
            let candidate = match serde_wasm_bindgen::to_value(rect) {
                Ok(value) => value,
                Err(_) => return true,
            };
            match callback.call1(&JsValue::NULL, &candidate) {
                Ok(result) => result.as_bool().unwrap_or(true),
                Err(err) => {
                    log::warn!("can_change_to callback threw: {:?}", err);
                    true
                }
            }
        });
    }

    /// Only accept crop frames inside the editor bounds.
    pub fn keep_crop_in_editor(&mut self) {
        let bounds = self.inner.editor_layout().bounds;
        self.inner
            .set_can_change_to(contained_in(Rect::from_origin_size(Point::ZERO, bounds)));
    }

    pub fn clear_can_change_to(&mut self) {
        self.inner.clear_can_change_to();
    }

    /// Whether `(x, y)` lands on the crop frame's edge bands. Hosts route
    /// other touches to pan/zoom.
    pub fn hits_crop_edge(&self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.inner.hits_crop_edge(Point::new(x, y)).map_err(core_error)
    }

    /// Returns the grabbed handle's name, e.g. `"TopLeft"` or `"Center"`.
    pub fn begin_crop_drag(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let handle = self
            .inner
            .begin_crop_drag(Point::new(x, y))
            .map_err(core_error)?;
        to_js(&handle)
    }

    /// The new layout, or `undefined` when nothing changed.
    pub fn update_crop_drag(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        let snapshot = self
            .inner
            .update_crop_drag(Vector2::new(dx, dy))
            .map_err(core_error)?;
        to_js(&snapshot)
    }

    /// Like `update_crop_drag`, but with the touch location `(x, y)` in
    /// editor coordinates.
    pub fn drag_crop_to(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let snapshot = self
            .inner
            .drag_crop_to(Point::new(x, y))
            .map_err(core_error)?;
        to_js(&snapshot)
    }

    /// Returns true when a settle was scheduled.
    pub fn end_crop_drag(&mut self, now_ms: Option<f64>) -> bool {
        self.inner.end_crop_drag(now(now_ms))
    }

    /// `phase` is `"began"`, `"changed"` or `"ended"`.
    pub fn dial_drag(&mut self, phase: &str, dx: f64) -> Result<JsValue, JsValue> {
        let phase = parse_phase(phase)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown gesture phase: {}", phase)))?;
        to_js(&self.inner.dial_drag(phase, dx))
    }

    pub fn set_dial_value(&mut self, angle: f64, animated: bool) -> Result<JsValue, JsValue> {
        to_js(&self.inner.set_dial_value(angle, animated))
    }

    /// The re-clamped layout, or `undefined` when the value did not move.
    pub fn set_dial_range(&mut self, min: f64, max: f64) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.set_dial_range(min, max).map_err(core_error)?;
        to_js(&snapshot)
    }

    pub fn rotate_90(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.rotate_90())
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.reset().map_err(core_error)?;
        to_js(&snapshot)
    }

    /// `index` follows the preset menu order: original, 1:1, 3:2, 5:3, 4:3,
    /// 5:4, 7:5, 16:9.
    pub fn set_aspect_preset(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let preset = AspectPreset::from_index(index)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown aspect preset: {}", index)))?;
        let snapshot = self.inner.set_aspect_preset(preset).map_err(core_error)?;
        to_js(&snapshot)
    }

    pub fn set_crop_ratio(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        let snapshot = self
            .inner
            .set_crop_ratio(Vector2::new(dx, dy))
            .map_err(core_error)?;
        to_js(&snapshot)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64, now_ms: Option<f64>) -> Result<JsValue, JsValue> {
        let snapshot = self
            .inner
            .pan_by(Vector2::new(dx, dy), now(now_ms))
            .map_err(core_error)?;
        to_js(&snapshot)
    }

    pub fn zoom_to(&mut self, zoom_scale: f64, now_ms: Option<f64>) -> Result<JsValue, JsValue> {
        let snapshot = self
            .inner
            .zoom_to(zoom_scale, now(now_ms))
            .map_err(core_error)?;
        to_js(&snapshot)
    }

    /// Drive the settle timer; the settled layout, or `undefined`.
    pub fn tick(&mut self, now_ms: Option<f64>) -> Result<JsValue, JsValue> {
        to_js(&self.inner.tick(now(now_ms)))
    }

    /// `{ rotation_angle, crop_rect: { x, y, width, height } }`
    pub fn commit(&self) -> Result<JsValue, JsValue> {
        let params = self.inner.commit().map_err(core_error)?;
        to_js(&params)
    }

    pub fn restore(&mut self, params: JsValue) -> Result<JsValue, JsValue> {
        let params: ExportParameters = from_js(params, "Invalid export parameters")?;
        let snapshot = self.inner.restore(&params).map_err(core_error)?;
        to_js(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phase() {
        assert_eq!(parse_phase("began"), Some(GesturePhase::Began));
        assert_eq!(parse_phase("Changed"), Some(GesturePhase::Changed));
        assert_eq!(parse_phase("END"), Some(GesturePhase::Ended));
        assert_eq!(parse_phase("hover"), None);
    }

    #[test]
    fn test_session_surface_without_js() {
        let mut session = JsEditorSession::with_config(
            Size::new(4000.0, 3000.0),
            Size::new(400.0, 800.0),
            EditorConfig::default(),
        )
        .unwrap();
        assert_eq!(session.rotation(), 0.0);
        assert!(!session.end_crop_drag(Some(0.0)));

        session.inner.rotate_90();
        assert_eq!(session.rotated_count(), 3);
        assert!(!session.settle_pending());
    }

    #[test]
    fn test_hits_crop_edge_without_js() {
        let session = JsEditorSession::with_config(
            Size::new(4000.0, 3000.0),
            Size::new(400.0, 800.0),
            EditorConfig::default(),
        )
        .unwrap();
        let frame = session.inner.crop_frame();
        assert!(session.hits_crop_edge(frame.x + 5.0, frame.mid_y()).unwrap());
        assert!(!session.hits_crop_edge(frame.mid_x(), frame.mid_y()).unwrap());
    }

    #[test]
    fn test_with_config_rejects_empty_image() {
        assert!(JsEditorSession::with_config(
            Size::new(0.0, 3000.0),
            Size::new(400.0, 800.0),
            EditorConfig::default(),
        )
        .is_err());
    }
}

/// WASM-specific tests that require JsValue.
///
/// These run only on wasm32 targets. Use `wasm-pack test` to run them.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use phototweak_core::LayoutSnapshot;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn session() -> JsEditorSession {
        JsEditorSession::new(4000.0, 3000.0, 400.0, 800.0, JsValue::UNDEFINED).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_snapshot_round_trips() {
        let session = session();
        let snapshot: LayoutSnapshot = from_js(session.snapshot().unwrap(), "snapshot").unwrap();
        assert_eq!(snapshot.rotated_count, 0);
        assert!(snapshot.dial_visible);
    }

    #[wasm_bindgen_test]
    fn test_commit_restore() {
        let mut session = session();
        session.set_dial_value(0.1, false).unwrap();
        let params = session.commit().unwrap();

        let mut fresh = self::session();
        fresh.restore(params).unwrap();
        assert!((fresh.rotation() - 0.1).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn test_unknown_phase_is_an_error() {
        let mut session = session();
        assert!(session.dial_drag("hover", 10.0).is_err());
        assert!(session.dial_drag("changed", 10.0).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_js_callback_rejects_drag() {
        let mut session = session();
        session.set_can_change_to(js_sys::Function::new_with_args("rect", "return false;"));
        session.begin_crop_drag(30.0, 185.0).unwrap();
        assert!(session.update_crop_drag(20.0, 20.0).unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_non_finite_input_is_an_error() {
        let mut session = session();
        assert!(session.begin_crop_drag(f64::NAN, 185.0).is_err());
        session.begin_crop_drag(30.0, 185.0).unwrap();
        assert!(session.update_crop_drag(f64::NEG_INFINITY, 0.0).is_err());
        assert!(session.drag_crop_to(f64::NAN, 0.0).is_err());
        assert!(session.set_dial_range(f64::NAN, f64::NAN).is_err());
        assert!(session.commit().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_drag_crop_to_returns_layout() {
        let mut session = session();
        let start: LayoutSnapshot = from_js(session.snapshot().unwrap(), "snapshot").unwrap();
        let frame = start.crop_frame;
        session
            .begin_crop_drag(frame.max_x() - 5.0, frame.max_y() - 5.0)
            .unwrap();
        let moved: LayoutSnapshot = from_js(
            session
                .drag_crop_to(frame.max_x() - 40.0, frame.max_y() - 30.0)
                .unwrap(),
            "snapshot",
        )
        .unwrap();
        assert!((moved.crop_frame.width - (frame.width - 40.0)).abs() < 1e-9);
        assert!((moved.crop_frame.height - (frame.height - 30.0)).abs() < 1e-9);
    }
}
