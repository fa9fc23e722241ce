use crate::application::{App, AppMode, QuizStep};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        match app.mode {
            AppMode::Quiz => Self::handle_quiz_mode(app, key),
            AppMode::Catalog => Self::handle_catalog_mode(app, key),
            AppMode::Cart => Self::handle_cart_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    /// Keys shared by the quiz and catalog screens. Returns `true` when
    /// the key was consumed.
    fn handle_global(app: &mut App, key: KeyCode) -> bool {
        match key {
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            KeyCode::Char('c') => app.open_cart(),
            _ => return false,
        }
        true
    }

    fn handle_quiz_mode(app: &mut App, key: KeyCode) {
        if Self::handle_global(app, key) {
            return;
        }
        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_option_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_option_cursor(1),
            KeyCode::Enter => app.confirm_option(),
            KeyCode::Char(' ') => {
                let position = app.option_cursor;
                app.pick_option(position);
            }
            KeyCode::Char(digit @ '1'..='5') => {
                let position = digit as usize - '1' as usize;
                app.pick_option(position);
            }
            KeyCode::Right | KeyCode::Char('n') => app.next_question(),
            KeyCode::Left | KeyCode::Char('p') => app.previous_question(),
            KeyCode::Char('r') => app.restart_quiz(),
            KeyCode::Char('s') => app.browse_all(),
            KeyCode::Esc => {
                if matches!(app.quiz.step(), QuizStep::SelectType) {
                    app.restart_quiz();
                }
            }
            _ => {}
        }
    }

    fn handle_catalog_mode(app: &mut App, key: KeyCode) {
        if Self::handle_global(app, key) {
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_product_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_product_cursor(1),
            KeyCode::Home => app.product_cursor = 0,
            KeyCode::Enter | KeyCode::Char('a') => app.add_selected_product(),
            KeyCode::Char('r') => app.retry_catalog(),
            KeyCode::Esc | KeyCode::Left | KeyCode::Char('b') => app.back_to_quiz(),
            _ => {}
        }
    }

    fn handle_cart_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_cart_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cart_cursor(1),
            KeyCode::Char('+') | KeyCode::Char('=') => app.increment_selected(),
            KeyCode::Char('-') => app.decrement_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_selected(),
            KeyCode::Char('x') => app.clear_cart(),
            KeyCode::Char('?') | KeyCode::F(1) => app.open_help(),
            KeyCode::Esc | KeyCode::Char('c') => app.close_overlay(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        let delta = match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_overlay();
                return;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => -1,
            KeyCode::Down | KeyCode::Char('j') => 1,
            KeyCode::PageUp => -HELP_PAGE,
            KeyCode::PageDown => HELP_PAGE,
            _ => return,
        };
        app.scroll_help(delta);
    }
}

const HELP_PAGE: isize = 5;
