//! Window-subsystem configuration variables (spec §6.2).

/// Lowest a [`Config::window_min_height`] value is ever clamped to, no
/// matter what the host writes.
const MIN_HEIGHT_FLOOR: u16 = 2;

/// Lowest a [`Config::window_min_width`] value is ever clamped to.
const MIN_WIDTH_FLOOR: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Mutable, externally visible configuration for one editor instance.
///
/// Unlike `sequence_number`/`use_time`/`selected_window` (which live on
/// [`crate::tree::Context`] so independent tests can have independent
/// counters), these are user-facing settings: it's fine, and expected, for
/// one `Config` to be shared by every `Tree` a host creates.
pub struct Config {
  window_min_height: u16,
  window_min_width: u16,
  pop_up_windows: bool,
  split_height_threshold: u16,
  next_screen_context_lines: u16,
  auto_new_screen: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl Config {
  pub fn builder() -> ConfigBuilder {
    ConfigBuilder::default()
  }

  /// Minimum height a leaf window may have, default 4. Clamped to `>= 2` on
  /// every write, matching the original's clamp-on-write semantics rather
  /// than just a clamped default.
  pub fn window_min_height(&self) -> u16 {
    self.window_min_height
  }

  pub fn set_window_min_height(&mut self, value: u16) {
    self.window_min_height = value.max(MIN_HEIGHT_FLOOR);
  }

  /// Minimum width a leaf window may have, default 10. Clamped to `>= 2`.
  pub fn window_min_width(&self) -> u16 {
    self.window_min_width
  }

  pub fn set_window_min_width(&mut self, value: u16) {
    self.window_min_width = value.max(MIN_WIDTH_FLOOR);
  }

  /// Whether [`crate::tree::display`] is allowed to split a window to show
  /// a buffer, default `true`.
  pub fn pop_up_windows(&self) -> bool {
    self.pop_up_windows
  }

  pub fn set_pop_up_windows(&mut self, value: bool) {
    self.pop_up_windows = value;
  }

  /// Height (in lines) a full-width window must reach before
  /// [`crate::tree::display`] prefers splitting it over reusing the LRU
  /// window, default 500.
  pub fn split_height_threshold(&self) -> u16 {
    self.split_height_threshold
  }

  pub fn set_split_height_threshold(&mut self, value: u16) {
    self.split_height_threshold = value;
  }

  /// Lines of context kept visible across a scroll, default 2.
  pub fn next_screen_context_lines(&self) -> u16 {
    self.next_screen_context_lines
  }

  pub fn set_next_screen_context_lines(&mut self, value: u16) {
    self.next_screen_context_lines = value;
  }

  /// Whether [`crate::tree::display`] may create a new screen rather than
  /// split the current one, default `false`.
  pub fn auto_new_screen(&self) -> bool {
    self.auto_new_screen
  }

  pub fn set_auto_new_screen(&mut self, value: bool) {
    self.auto_new_screen = value;
  }
}

/// The builder for [`Config`].
pub struct ConfigBuilder {
  window_min_height: u16,
  window_min_width: u16,
  pop_up_windows: bool,
  split_height_threshold: u16,
  next_screen_context_lines: u16,
  auto_new_screen: bool,
}

impl ConfigBuilder {
  pub fn window_min_height(&mut self, value: u16) -> &mut Self {
    self.window_min_height = value.max(MIN_HEIGHT_FLOOR);
    self
  }
  pub fn window_min_width(&mut self, value: u16) -> &mut Self {
    self.window_min_width = value.max(MIN_WIDTH_FLOOR);
    self
  }
  pub fn pop_up_windows(&mut self, value: bool) -> &mut Self {
    self.pop_up_windows = value;
    self
  }
  pub fn split_height_threshold(&mut self, value: u16) -> &mut Self {
    self.split_height_threshold = value;
    self
  }
  pub fn next_screen_context_lines(&mut self, value: u16) -> &mut Self {
    self.next_screen_context_lines = value;
    self
  }
  pub fn auto_new_screen(&mut self, value: bool) -> &mut Self {
    self.auto_new_screen = value;
    self
  }

  pub fn build(&self) -> Config {
    Config {
      window_min_height: self.window_min_height,
      window_min_width: self.window_min_width,
      pop_up_windows: self.pop_up_windows,
      split_height_threshold: self.split_height_threshold,
      next_screen_context_lines: self.next_screen_context_lines,
      auto_new_screen: self.auto_new_screen,
    }
  }
}

impl Default for ConfigBuilder {
  fn default() -> Self {
    ConfigBuilder {
      window_min_height: 4,
      window_min_width: 10,
      pop_up_windows: true,
      split_height_threshold: 500,
      next_screen_context_lines: 2,
      auto_new_screen: false,
    }
  }
}
