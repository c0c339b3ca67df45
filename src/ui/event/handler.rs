use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use askql_app::action::Action;
use askql_app::editor::{CursorMove, EditorKey};
use askql_app::input_mode::InputMode;
use askql_app::state::AppState;

use super::Event;

pub fn handle_event(event: Event, state: &AppState) -> Action {
    match event {
        Event::Init => Action::LoadSchema,
        Event::Render => Action::Render,
        Event::Resize(w, h) => Action::Resize(w, h),
        Event::Key(key) => handle_key_event(key, state),
    }
}

fn handle_key_event(key: KeyEvent, state: &AppState) -> Action {
    if let Some(action) = handle_global_keys(key) {
        return action;
    }
    match state.input_mode {
        InputMode::Question => handle_question_keys(key),
        InputMode::Editor => handle_editor_keys(key),
    }
}

fn handle_global_keys(key: KeyEvent) -> Option<Action> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('c' | 'q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::ReloadSchema),
        _ => None,
    }
}

fn handle_question_keys(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => Action::QuestionClear,
        (KeyCode::Char(_), m) if m.contains(KeyModifiers::CONTROL) => Action::None,
        (KeyCode::Char(c), _) => Action::QuestionInput(c),
        (KeyCode::Backspace, _) => Action::QuestionBackspace,
        (KeyCode::Enter, _) => Action::SubmitQuestion,
        (KeyCode::Tab | KeyCode::BackTab, _) => Action::ToggleFocus,
        (KeyCode::Esc, _) => Action::Escape,
        _ => Action::None,
    }
}

fn handle_editor_keys(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => Action::EditorClear,
        (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => Action::ExecuteQuery,
        (KeyCode::Char(_), m) if m.contains(KeyModifiers::CONTROL) => Action::None,
        // Shift+Tab leaves the editor; plain Tab belongs to the suggestion box
        (KeyCode::BackTab, _) => Action::ToggleFocus,
        (KeyCode::Tab, m) if m.contains(KeyModifiers::SHIFT) => Action::ToggleFocus,
        (code, _) => editor_key(code).map_or(Action::None, Action::Editor),
    }
}

fn editor_key(code: KeyCode) -> Option<EditorKey> {
    let key = match code {
        KeyCode::Char(c) => EditorKey::Char(c),
        KeyCode::Backspace => EditorKey::Backspace,
        KeyCode::Delete => EditorKey::Delete,
        KeyCode::Enter => EditorKey::Enter,
        KeyCode::Tab => EditorKey::Tab,
        KeyCode::Esc => EditorKey::Escape,
        KeyCode::Left => EditorKey::Move(CursorMove::Left),
        KeyCode::Right => EditorKey::Move(CursorMove::Right),
        KeyCode::Up => EditorKey::Move(CursorMove::Up),
        KeyCode::Down => EditorKey::Move(CursorMove::Down),
        KeyCode::Home => EditorKey::Move(CursorMove::Home),
        KeyCode::End => EditorKey::Move(CursorMove::End),
        _ => return None,
    };
    Some(key)
}
