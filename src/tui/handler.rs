use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InputMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    ShowReport,
    RegenerateReport,
    RefreshChannels,
    ToggleSaved,
    OpenInBrowser,
    CycleFilter,
    ToggleSort,
    ToggleMark,
    DeleteVideo,
    ClearSearch,
    ShowHelp,
    HideHelp,
    // Popup input actions
    StartInput(InputMode),
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(key: KeyEvent, input_active: bool, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('<'), _) | (KeyCode::Home, _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) | (KeyCode::End, _) => Some(AppAction::MoveToBottom),

        (KeyCode::Enter, _) => Some(AppAction::ShowReport),
        (KeyCode::Char('g'), _) => Some(AppAction::RegenerateReport),

        (KeyCode::Char('a'), _) => Some(AppAction::StartInput(InputMode::AddVideo)),
        (KeyCode::Char('/'), _) => Some(AppAction::StartInput(InputMode::Search)),
        (KeyCode::Esc, _) => Some(AppAction::ClearSearch),

        (KeyCode::Char('r'), _) => Some(AppAction::RefreshChannels),
        (KeyCode::Char('b'), _) => Some(AppAction::ToggleSaved),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleFilter),
        (KeyCode::Char('s'), _) => Some(AppAction::ToggleSort),
        (KeyCode::Char(' '), _) => Some(AppAction::ToggleMark),
        (KeyCode::Char('d'), _) => Some(AppAction::DeleteVideo),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn help_swallows_any_key() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), false, true),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn input_mode_captures_letters() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), true, false),
            Some(AppAction::InputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), true, false),
            Some(AppAction::InputCancel)
        );
    }

    #[test]
    fn normal_mode_bindings() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('/')), false, false),
            Some(AppAction::StartInput(InputMode::Search))
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), false, false),
            Some(AppAction::Quit)
        );
        assert_eq!(handle_key_event(key(KeyCode::Tab), false, false), None);
    }
}
