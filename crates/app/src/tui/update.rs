use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use gempa_core::app::{Command, Trigger};
use super::model::{TuiModel, ViewMode};

/// Messages that can be sent from the TUI to the monitor service
#[derive(Debug, Clone, PartialEq)]
pub enum TuiMessage {
    /// Send a command to the monitor service
    Command(Command),

    /// No action needed
    None,
}

/// The Update function - handles user input and updates the model
/// This is the core of the MVU pattern's Update component
pub struct TuiUpdate;

impl TuiUpdate {
    /// Handle a key press and update the model accordingly
    /// Returns a TuiMessage that should be sent to the monitor service
    pub fn handle_key(
        model: &mut TuiModel,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<TuiMessage> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(TuiMessage::Command(Command::Quit));
        }

        match model.mode {
            ViewMode::Map => Self::handle_map_keys(model, key, modifiers),
            ViewMode::Help => Self::handle_help_keys(model, key, modifiers),
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(model: &mut TuiModel, width: u16, height: u16) -> Result<TuiMessage> {
        model.ui_state.terminal_width = width;
        model.ui_state.terminal_height = height;
        Ok(TuiMessage::None)
    }

    fn handle_map_keys(
        model: &mut TuiModel,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> Result<TuiMessage> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => Ok(TuiMessage::Command(Command::Quit)),

            KeyCode::Char('?') => {
                model.mode = ViewMode::Help;
                Ok(TuiMessage::None)
            }

            // Manual refresh; the service ignores it if a fetch is running
            KeyCode::Char('r') | KeyCode::F(5) => {
                model.start_refresh_spin();
                Ok(TuiMessage::Command(Command::Refresh {
                    trigger: Trigger::Manual,
                }))
            }

            KeyCode::Char('s') => {
                model.toggle_layer();
                Ok(TuiMessage::None)
            }

            KeyCode::Char('c') => {
                model.recenter();
                Ok(TuiMessage::None)
            }

            KeyCode::Char('p') => {
                model.toggle_popup();
                Ok(TuiMessage::None)
            }

            _ => Ok(TuiMessage::None),
        }
    }

    /// Handle keys in help view
    fn handle_help_keys(
        model: &mut TuiModel,
        _key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> Result<TuiMessage> {
        // Any key exits help
        model.mode = ViewMode::Map;
        Ok(TuiMessage::None)
    }
}
