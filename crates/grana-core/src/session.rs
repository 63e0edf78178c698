//! Editing session
//!
//! Owns everything one opened image needs: the full-resolution source, the
//! display-bounded working copy, the per-session grain noise, the live
//! parameter set with its history, and the render scheduler. Interactive
//! edits flow through here; the pipeline itself stays a pure function.

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Instant;

use rand::Rng;

use crate::config::CoreDefaults;
use crate::decoders::{decode_image, DecodedImage};
use crate::history::HistoryStack;
use crate::models::{EditParams, ParamField, PredictedPreset, Rgb};
use crate::noise::NoiseField;
use crate::pipeline::{render, RenderContext, RenderedFrame};
use crate::predict::{apply_prediction, predict_preset, ModelRegistry};
use crate::scheduler::{RenderJob, RenderScheduler};
use crate::verbose_println;

/// The three muteable effect categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteCategory {
    Grain,
    Adjust,
    Tone,
}

/// One image's editing state.
pub struct EditSession {
    defaults: CoreDefaults,
    registry: Arc<ModelRegistry>,

    full_base: Arc<DecodedImage>,
    working_base: Arc<DecodedImage>,

    /// Seed fixed at load so the grain pattern is stable for the whole
    /// session, at preview and export resolution alike.
    seed: u32,
    noise_ready: OnceLock<Arc<NoiseField>>,
    noise_worker: Mutex<Option<JoinHandle<NoiseField>>>,

    params: EditParams,
    history: HistoryStack,
    scheduler: RenderScheduler,
}

impl EditSession {
    /// Open an image file and start a session with a random grain seed.
    pub fn open<P: AsRef<Path>>(
        path: P,
        defaults: CoreDefaults,
        registry: Arc<ModelRegistry>,
    ) -> Result<Self, String> {
        let image = decode_image(path)?;
        let seed = rand::thread_rng().gen();
        Ok(Self::from_image(image, defaults, registry, seed))
    }

    /// Start a session from an already-decoded image with a fixed seed.
    pub fn from_image(
        image: DecodedImage,
        defaults: CoreDefaults,
        registry: Arc<ModelRegistry>,
        seed: u32,
    ) -> Self {
        let working_base = Arc::new(image.downscale_to(defaults.max_working_dim));
        let full_base = Arc::new(image);

        verbose_println!(
            "[grana] session: {}x{} source, {}x{} working, seed {}",
            full_base.width,
            full_base.height,
            working_base.width,
            working_base.height,
            seed
        );

        // Kick off noise generation immediately so it is usually finished
        // before the first grain render asks for it.
        let (w, h) = (working_base.width, working_base.height);
        let noise_worker = std::thread::spawn(move || NoiseField::generate(w, h, seed));

        let params = EditParams::default();
        Self {
            registry,
            full_base,
            working_base,
            seed,
            noise_ready: OnceLock::new(),
            noise_worker: Mutex::new(Some(noise_worker)),
            history: HistoryStack::new(params.clone()),
            params,
            scheduler: RenderScheduler::new(RenderContext::new(&defaults)),
            defaults,
        }
    }

    pub fn params(&self) -> &EditParams {
        &self.params
    }

    pub fn working_base(&self) -> &DecodedImage {
        &self.working_base
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Minimum visible busy duration for preset prediction. A call to
    /// [`EditSession::request_preset`] never returns faster than this.
    pub fn min_preset_busy(&self) -> std::time::Duration {
        self.defaults.min_preset_busy()
    }

    /// Assign one numeric control.
    ///
    /// A live (drag) update only queues a coalesced preview render; the
    /// history is untouched until the gesture ends with `committed` set,
    /// which snapshots the value and renders it to completion. While the
    /// noise field is still generating, a live update keeps the new value
    /// but skips the render, so the prior frame persists.
    pub fn set_param(&mut self, field: ParamField, value: f32, committed: bool) {
        self.params.set_field(field, value);
        if committed {
            self.commit_and_render();
        } else if let Some(noise) = self.try_working_noise() {
            self.scheduler.submit(RenderJob {
                base: Arc::clone(&self.working_base),
                noise,
                params: self.params.clone(),
            });
        }
    }

    /// Toggle the highlight overlay. Discrete action, committed at once.
    pub fn set_bright_overlay(&mut self, on: bool) {
        self.params.is_on_bright_color = on;
        if on {
            self.params.is_tone_mute = false;
        }
        self.commit_and_render();
    }

    /// Toggle the shadow overlay. Discrete action, committed at once.
    pub fn set_dark_overlay(&mut self, on: bool) {
        self.params.is_on_dark_color = on;
        if on {
            self.params.is_tone_mute = false;
        }
        self.commit_and_render();
    }

    pub fn set_bright_color(&mut self, color: Rgb) {
        self.params.bright_color = color;
        self.commit_and_render();
    }

    pub fn set_dark_color(&mut self, color: Rgb) {
        self.params.dark_color = color;
        self.commit_and_render();
    }

    /// Mute or unmute a whole category without disturbing its stored
    /// values.
    pub fn set_mute(&mut self, category: MuteCategory, muted: bool) {
        match category {
            MuteCategory::Grain => self.params.is_grain_mute = muted,
            MuteCategory::Adjust => self.params.is_adjust_mute = muted,
            MuteCategory::Tone => self.params.is_tone_mute = muted,
        }
        self.commit_and_render();
    }

    /// Replace the whole parameter set, e.g. from a loaded preset file.
    pub fn set_params(&mut self, mut params: EditParams) {
        params.sanitize();
        self.params = params;
        self.commit_and_render();
    }

    /// Step back one committed state. Returns false at the initial state.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        self.history.undo();
        self.params = self.history.current().clone();
        self.scheduler.render_blocking(self.working_job());
        true
    }

    /// Step forward along the redo branch. Returns false at the newest
    /// state.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.history.redo();
        self.params = self.history.current().clone();
        self.scheduler.render_blocking(self.working_job());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Run the preset predictor on the working image and fold the result
    /// into the parameters as one committed edit.
    ///
    /// Any failure (degenerate image, model error) leaves the session
    /// untouched and returns `None`. The call lasts at least the
    /// configured busy duration so a frontend's progress affordance does
    /// not flash.
    pub fn request_preset(&mut self) -> Option<PredictedPreset> {
        let started = Instant::now();
        let preset = self.predict();
        if let Some(preset) = &preset {
            apply_prediction(&mut self.params, preset);
            self.commit_and_render();
        }

        let min_busy = self.defaults.min_preset_busy();
        if let Some(remaining) = min_busy.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
        preset
    }

    fn predict(&self) -> Option<PredictedPreset> {
        let features = crate::features::extract_features_with(
            &self.working_base,
            self.defaults.thumbnail_dim,
        )?;
        predict_preset(&self.registry, &features)
    }

    /// The most recently completed preview frame.
    pub fn latest_frame(&self) -> Option<Arc<RenderedFrame>> {
        self.scheduler.latest_frame()
    }

    /// Block until the preview queue drains and return the final frame.
    pub fn wait_idle(&self) -> Option<Arc<RenderedFrame>> {
        self.scheduler.wait_idle()
    }

    /// Render the current parameters against the full-resolution source.
    ///
    /// Uses the session seed at full resolution, so the grain pattern and
    /// apparent size match the preview.
    pub fn export(&self) -> RenderedFrame {
        let noise =
            NoiseField::generate(self.full_base.width, self.full_base.height, self.seed);
        let ctx = RenderContext::new(&self.defaults);
        render(&ctx, &self.full_base, &noise, &self.params)
    }

    fn commit_and_render(&mut self) {
        self.history.commit(self.params.clone());
        self.scheduler.render_blocking(self.working_job());
    }

    fn working_job(&self) -> RenderJob {
        RenderJob {
            base: Arc::clone(&self.working_base),
            noise: self.working_noise(),
            params: self.params.clone(),
        }
    }

    /// The session noise field if generation has finished, without ever
    /// blocking the caller.
    fn try_working_noise(&self) -> Option<Arc<NoiseField>> {
        if let Some(noise) = self.noise_ready.get() {
            return Some(Arc::clone(noise));
        }
        let finished = match self.noise_worker.lock() {
            Ok(slot) => slot.as_ref().map(|h| h.is_finished()),
            Err(_) => None,
        };
        match finished {
            Some(true) => Some(self.working_noise()),
            _ => None,
        }
    }

    /// The session noise field, waiting for the background generator the
    /// first time it is needed.
    fn working_noise(&self) -> Arc<NoiseField> {
        Arc::clone(self.noise_ready.get_or_init(|| {
            let handle = match self.noise_worker.lock() {
                Ok(mut slot) => slot.take(),
                Err(_) => None,
            };
            let field = match handle.map(|h| h.join()) {
                Some(Ok(field)) => field,
                _ => NoiseField::generate(
                    self.working_base.width,
                    self.working_base.height,
                    self.seed,
                ),
            };
            Arc::new(field)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(image: DecodedImage) -> EditSession {
        let registry = Arc::new(ModelRegistry::load_builtin().unwrap());
        let mut defaults = CoreDefaults::default();
        defaults.min_preset_busy_ms = 0;
        EditSession::from_image(image, defaults, registry, 42)
    }

    fn gradient_image(width: u32, height: u32) -> DecodedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = (x + y) as f32 / (width + height) as f32;
                data.extend_from_slice(&[v, v * 0.8, v * 0.6]);
            }
        }
        DecodedImage::from_rgb(width, height, data).unwrap()
    }

    /// A session whose noise generator takes at least `delay_ms` to
    /// finish, so tests can observe the not-yet-ready window.
    fn session_with_slow_noise(delay_ms: u64) -> EditSession {
        let registry = Arc::new(ModelRegistry::load_builtin().unwrap());
        let mut defaults = CoreDefaults::default();
        defaults.min_preset_busy_ms = 0;

        let image = gradient_image(32, 32);
        let working_base = Arc::new(image.clone());
        let params = EditParams::default();
        let noise_worker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
            NoiseField::generate(32, 32, 1)
        });

        EditSession {
            registry,
            full_base: Arc::new(image),
            working_base,
            seed: 1,
            noise_ready: OnceLock::new(),
            noise_worker: Mutex::new(Some(noise_worker)),
            history: HistoryStack::new(params.clone()),
            params,
            scheduler: RenderScheduler::new(RenderContext::new(&defaults)),
            defaults,
        }
    }

    #[test]
    fn test_live_edit_with_pending_noise_is_a_silent_no_op() {
        let mut session = session_with_slow_noise(500);

        session.set_param(ParamField::GrainAlpha, 0.4, false);
        assert_eq!(session.params().grain_alpha, 0.4, "value still applies");
        assert!(
            session.latest_frame().is_none(),
            "no render may run before the noise field exists"
        );
        assert_eq!(session.history_len(), 1);

        // A committed edit waits for the field and renders to completion.
        session.set_param(ParamField::GrainAlpha, 0.5, true);
        assert!(session.latest_frame().is_some());
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_live_updates_do_not_touch_history() {
        let mut session = session_with(gradient_image(64, 64));
        assert_eq!(session.history_len(), 1);

        for value in [0.1, 0.2, 0.3, 0.4] {
            session.set_param(ParamField::GrainAlpha, value, false);
        }
        assert_eq!(session.history_len(), 1, "drags must not create snapshots");

        session.set_param(ParamField::GrainAlpha, 0.5, true);
        assert_eq!(session.history_len(), 2);
        assert_eq!(session.params().grain_alpha, 0.5);
    }

    #[test]
    fn test_committed_edit_renders_to_completion() {
        let mut session = session_with(gradient_image(48, 32));
        session.set_param(ParamField::Contrast, 1.15, true);

        let frame = session.latest_frame().unwrap();
        assert_eq!(frame.width, 48);
        assert_eq!(frame.height, 32);
    }

    #[test]
    fn test_undo_redo_restore_parameters() {
        let mut session = session_with(gradient_image(32, 32));
        session.set_param(ParamField::Contrast, 1.1, true);
        session.set_param(ParamField::Temperature, 5000.0, true);

        assert!(session.undo());
        assert_eq!(session.params().contrast, 1.1);
        assert_eq!(session.params().temperature, 6500.0);

        assert!(session.undo());
        assert_eq!(session.params().contrast, 1.0);
        assert!(!session.undo(), "initial state has no further undo");

        assert!(session.redo());
        assert!(session.redo());
        assert_eq!(session.params().temperature, 5000.0);
        assert!(!session.redo());
    }

    #[test]
    fn test_working_copy_is_display_bounded() {
        let registry = Arc::new(ModelRegistry::load_builtin().unwrap());
        let mut defaults = CoreDefaults::default();
        defaults.max_working_dim = 64;
        defaults.min_preset_busy_ms = 0;
        let session =
            EditSession::from_image(gradient_image(256, 128), defaults, registry, 7);

        assert_eq!(session.working_base().long_side(), 64);
    }

    #[test]
    fn test_enabling_overlay_clears_tone_mute() {
        let mut session = session_with(gradient_image(32, 32));
        session.set_mute(MuteCategory::Tone, true);
        assert!(session.params().is_tone_mute);

        session.set_dark_overlay(true);
        assert!(!session.params().is_tone_mute);
        assert!(session.params().is_on_dark_color);
    }

    #[test]
    fn test_mute_preserves_stored_values() {
        let mut session = session_with(gradient_image(32, 32));
        session.set_param(ParamField::GrainAlpha, 0.8, true);
        session.set_mute(MuteCategory::Grain, true);
        assert_eq!(session.params().grain_alpha, 0.8);
    }

    #[test]
    fn test_request_preset_commits_once() {
        let mut session = session_with(gradient_image(64, 64));
        let before = session.history_len();
        let preset = session.request_preset();
        assert!(preset.is_some());
        assert_eq!(session.history_len(), before + 1);
    }

    #[test]
    fn test_export_matches_source_dimensions() {
        let registry = Arc::new(ModelRegistry::load_builtin().unwrap());
        let mut defaults = CoreDefaults::default();
        defaults.max_working_dim = 64;
        defaults.min_preset_busy_ms = 0;
        let mut session =
            EditSession::from_image(gradient_image(200, 100), defaults, registry, 9);

        session.set_param(ParamField::GrainAlpha, 0.5, true);
        let frame = session.export();
        assert_eq!(frame.width, 200);
        assert_eq!(frame.height, 100);
    }

    #[test]
    fn test_export_is_deterministic_for_a_session() {
        let mut session = session_with(gradient_image(80, 60));
        session.set_param(ParamField::GrainAlpha, 0.6, true);
        let a = session.export();
        let b = session.export();
        assert_eq!(a, b);
    }
}
