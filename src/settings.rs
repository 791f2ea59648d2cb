//! Connection settings exchanged via SETTINGS frames.

use crate::frame::Setting;

/// Default initial flow-control window.
pub const DEFAULT_INITIAL_WINDOW_SIZE: u32 = 65_535;

/// Default maximum frame payload used when chunking DATA.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Default HPACK header table size.
pub const DEFAULT_HEADER_TABLE_SIZE: u32 = 4_096;

/// A peer's view of the negotiable parameters.
///
/// Unknown identifiers are dropped by the frame parser before they get
/// here; [`Settings::apply`] folds a received SETTINGS payload in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub header_table_size: u32,
    pub enable_push: bool,
    pub max_concurrent_streams: u32,
    pub initial_window_size: u32,
    pub compress_data: bool,
    /// Fixed at this draft; not negotiated over the wire.
    pub max_frame_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            header_table_size: DEFAULT_HEADER_TABLE_SIZE,
            enable_push: true,
            max_concurrent_streams: u32::MAX,
            initial_window_size: DEFAULT_INITIAL_WINDOW_SIZE,
            compress_data: false,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Settings {
    /// Fold a received SETTINGS payload into this view.
    pub fn apply(&mut self, settings: &[(Setting, u32)]) {
        for (id, value) in settings {
            match id {
                Setting::HeaderTableSize => self.header_table_size = *value,
                Setting::EnablePush => self.enable_push = *value != 0,
                Setting::MaxConcurrentStreams => self.max_concurrent_streams = *value,
                Setting::InitialWindowSize => self.initial_window_size = *value,
                Setting::CompressData => self.compress_data = *value != 0,
            }
        }
    }

    /// Serialize the non-default parameters as a SETTINGS payload.
    pub fn to_payload(&self) -> Vec<(Setting, u32)> {
        let defaults = Self::default();
        let mut out = Vec::new();
        if self.header_table_size != defaults.header_table_size {
            out.push((Setting::HeaderTableSize, self.header_table_size));
        }
        if self.enable_push != defaults.enable_push {
            out.push((Setting::EnablePush, self.enable_push as u32));
        }
        if self.max_concurrent_streams != defaults.max_concurrent_streams {
            out.push((Setting::MaxConcurrentStreams, self.max_concurrent_streams));
        }
        if self.initial_window_size != defaults.initial_window_size {
            out.push((Setting::InitialWindowSize, self.initial_window_size));
        }
        if self.compress_data != defaults.compress_data {
            out.push((Setting::CompressData, self.compress_data as u32));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut settings = Settings::default();
        settings.apply(&[
            (Setting::InitialWindowSize, 100_000),
            (Setting::EnablePush, 0),
        ]);
        assert_eq!(settings.initial_window_size, 100_000);
        assert!(!settings.enable_push);
        assert_eq!(settings.header_table_size, DEFAULT_HEADER_TABLE_SIZE);
    }

    #[test]
    fn test_payload_only_carries_changes() {
        let mut settings = Settings::default();
        assert!(settings.to_payload().is_empty());

        settings.max_concurrent_streams = 100;
        assert_eq!(
            settings.to_payload(),
            vec![(Setting::MaxConcurrentStreams, 100)]
        );
    }
}
