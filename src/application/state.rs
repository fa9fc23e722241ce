//! Application state management for the terminal storefront.
//!
//! `App` is the composition root's single state container. It owns the
//! quiz engine, the cart store and the catalog view, plus the cursor and
//! status state the terminal UI needs.

use super::cart::CartStore;
use super::catalog::CatalogView;
use super::quiz::{QuizEngine, QuizStep, Transition};
use crate::domain::{Category, LineInput};
use crate::infrastructure::{CatalogRequest, CatalogResponse};
use tracing::info;

/// Which screen or overlay currently receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// The quiz screen (all quiz steps)
    Quiz,
    /// Product listing
    Catalog,
    /// Cart drawer over the previous screen
    Cart,
    /// Help popup over the previous screen
    Help,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use skinshop::application::{App, AppMode};
///
/// let app = App::default();
/// assert_eq!(app.mode, AppMode::Quiz);
/// assert_eq!(app.option_cursor, 0);
/// ```
#[derive(Debug)]
pub struct App {
    pub quiz: QuizEngine,
    pub cart: CartStore,
    pub catalog: CatalogView,
    /// Current application mode
    pub mode: AppMode,
    /// Screen to return to when an overlay closes
    pub base_mode: AppMode,
    /// Highlighted option on the quiz screen
    pub option_cursor: usize,
    /// Highlighted product in the catalog
    pub product_cursor: usize,
    /// Highlighted line in the cart drawer
    pub cart_cursor: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(QuizEngine::default(), CartStore::in_memory(), CatalogView::default())
    }
}

impl App {
    /// Creates the application state around its three components.
    ///
    /// A storage warning raised while the cart was being restored is moved
    /// straight into the status bar.
    ///
    /// # Arguments
    ///
    /// * `quiz` - The questionnaire to run
    /// * `cart` - The cart, already rehydrated from its repository
    /// * `catalog` - The catalog view with its page size
    pub fn new(quiz: QuizEngine, cart: CartStore, catalog: CatalogView) -> Self {
        let mut app = Self {
            quiz,
            cart,
            catalog,
            mode: AppMode::Quiz,
            base_mode: AppMode::Quiz,
            option_cursor: 0,
            product_cursor: 0,
            cart_cursor: 0,
            help_scroll: 0,
            status_message: None,
        };
        app.surface_cart_warning();
        app
    }

    /// Number of selectable options on the quiz screen.
    pub fn option_count(&self) -> usize {
        match self.quiz.step() {
            QuizStep::Initial => 2,
            QuizStep::SelectType => Category::ALL.len(),
            QuizStep::InProgress { .. } => self
                .quiz
                .current_question()
                .map(|question| question.options.len())
                .unwrap_or(0),
            QuizStep::Finished { .. } => 0,
        }
    }

    /// Moves the highlighted quiz option, staying within the options shown.
    pub fn move_option_cursor(&mut self, delta: isize) {
        self.option_cursor = step_cursor(self.option_cursor, delta, self.option_count());
    }

    /// Acts on the highlighted quiz option.
    ///
    /// On a question this records the highlighted answer and moves on.
    pub fn confirm_option(&mut self) {
        match self.quiz.step() {
            QuizStep::Initial => {
                self.quiz.choose_knows_own_type(self.option_cursor == 0);
                self.sync_option_cursor();
            }
            QuizStep::SelectType => {
                if let Some(category) = Category::ALL.get(self.option_cursor) {
                    self.declare_type(*category);
                }
            }
            QuizStep::InProgress { .. } => {
                if let Some(category) = self.highlighted_answer() {
                    self.quiz.answer_current(category);
                    self.next_question();
                }
            }
            QuizStep::Finished { .. } => self.shop_for_result(),
        }
    }

    fn highlighted_answer(&self) -> Option<Category> {
        self.quiz
            .current_question()
            .and_then(|question| question.options.get(self.option_cursor))
            .map(|option| option.category)
    }

    /// Picks an option by its position, as the number keys do.
    pub fn pick_option(&mut self, position: usize) {
        if position >= self.option_count() {
            return;
        }
        self.option_cursor = position;
        match self.quiz.step() {
            QuizStep::InProgress { .. } => {
                if let Some(category) = self.highlighted_answer() {
                    self.quiz.answer_current(category);
                }
            }
            QuizStep::Initial | QuizStep::SelectType => self.confirm_option(),
            QuizStep::Finished { .. } => {}
        }
    }

    /// Finishes the quiz with a skin type the visitor picked directly.
    ///
    /// Only has an effect on the type selection screen.
    pub fn declare_type(&mut self, category: Category) {
        if let Transition::Finished(result) = self.quiz.select_declared_type(category) {
            self.status_message = Some(format!("Your skin type: {}", result.profile().label));
        }
        self.sync_option_cursor();
    }

    /// Moves to the next question, or shows the result after the last one.
    ///
    /// Stays put with a status message when the current question has no
    /// answer yet.
    pub fn next_question(&mut self) {
        match self.quiz.advance() {
            Transition::Blocked => {
                self.status_message = Some("Choose an answer before continuing".to_string());
            }
            Transition::Finished(result) => {
                info!(result = %result, "quiz completed");
                self.status_message = Some(format!("Your skin type: {}", result.profile().label));
            }
            Transition::Moved | Transition::Ignored => {}
        }
        self.sync_option_cursor();
    }

    /// Goes back one question. From the first question this returns to the
    /// opening screen.
    pub fn previous_question(&mut self) {
        self.quiz.retreat();
        self.sync_option_cursor();
    }

    /// Clears every answer and returns to the opening screen.
    pub fn restart_quiz(&mut self) {
        self.quiz.restart();
        self.option_cursor = 0;
        self.status_message = None;
    }

    /// Puts the cursor on the recorded answer, or the first option.
    fn sync_option_cursor(&mut self) {
        self.option_cursor = self
            .quiz
            .current_answer()
            .and_then(|answer| {
                self.quiz
                    .current_question()
                    .and_then(|q| q.options.iter().position(|o| o.category == answer))
            })
            .unwrap_or(0);
    }

    /// Opens the catalog filtered for the quiz result.
    pub fn shop_for_result(&mut self) {
        if let Some(result) = self.quiz.result() {
            self.open_catalog(Some(result));
        }
    }

    /// Opens the unfiltered catalog.
    pub fn browse_all(&mut self) {
        self.open_catalog(None);
    }

    fn open_catalog(&mut self, filter: Option<Category>) {
        self.catalog.open(filter);
        self.mode = AppMode::Catalog;
        self.base_mode = AppMode::Catalog;
        self.product_cursor = 0;
        self.status_message = None;
    }

    /// Leaves the catalog. Any fetch still running for it is abandoned.
    pub fn back_to_quiz(&mut self) {
        self.catalog.leave();
        self.mode = AppMode::Quiz;
        self.base_mode = AppMode::Quiz;
        self.status_message = None;
    }

    /// Fetches the current listing again. Ignored while a fetch is running.
    pub fn retry_catalog(&mut self) {
        if self.catalog.refresh() {
            self.product_cursor = 0;
            self.status_message = None;
        }
    }

    /// Hands out the fetch the catalog is waiting for, at most once.
    pub fn take_catalog_request(&mut self) -> Option<CatalogRequest> {
        self.catalog.take_request()
    }

    /// Applies a finished fetch. Responses for a listing that is no longer
    /// shown are dropped.
    pub fn apply_catalog_response(&mut self, response: CatalogResponse) {
        if !self.catalog.apply(response) {
            return;
        }
        let count = self.catalog.products().len();
        self.product_cursor = self.product_cursor.min(count.saturating_sub(1));
        if let super::catalog::CatalogStatus::Failed(e) = self.catalog.status() {
            self.status_message = Some(format!("Failed to load products: {}", e));
        }
    }

    /// Moves the highlighted product within the loaded listing.
    pub fn move_product_cursor(&mut self, delta: isize) {
        self.product_cursor = step_cursor(self.product_cursor, delta, self.catalog.products().len());
    }

    /// Adds the highlighted product's first variant to the cart.
    ///
    /// The line is checked against the listing on screen first, which also
    /// refreshes its price. The outcome lands in the status bar.
    pub fn add_selected_product(&mut self) {
        let Some(product) = self.catalog.products().get(self.product_cursor) else {
            return;
        };
        let title = product.title.clone();
        let catalog = &self.catalog;
        let outcome = LineInput::from_product(product, 1)
            .and_then(|input| self.cart.add_item_checked(input, |_, line| catalog.verify_line(line)));

        self.status_message = Some(match outcome {
            Ok(()) => format!("Added to cart: {}", title),
            Err(e) => format!("Failed to add to cart: {}", e),
        });
        self.surface_cart_warning();
    }

    /// Shows the cart drawer over the quiz or catalog screen.
    pub fn open_cart(&mut self) {
        if matches!(self.mode, AppMode::Quiz | AppMode::Catalog) {
            self.base_mode = self.mode;
            self.mode = AppMode::Cart;
            self.clamp_cart_cursor();
        }
    }

    /// Shows the help popup from the top.
    pub fn open_help(&mut self) {
        if matches!(self.mode, AppMode::Quiz | AppMode::Catalog) {
            self.base_mode = self.mode;
        }
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    /// Closes the cart drawer or help popup, returning to the screen below.
    pub fn close_overlay(&mut self) {
        if matches!(self.mode, AppMode::Cart | AppMode::Help) {
            self.mode = self.base_mode;
        }
    }

    /// Scrolls the help text. The popup clamps the far end to what it can
    /// show.
    pub fn scroll_help(&mut self, delta: isize) {
        self.help_scroll = self.help_scroll.saturating_add_signed(delta);
    }

    /// Moves the highlighted cart line.
    pub fn move_cart_cursor(&mut self, delta: isize) {
        self.cart_cursor = step_cursor(self.cart_cursor, delta, self.cart.items().len());
    }

    fn selected_variant(&self) -> Option<String> {
        self.cart
            .items()
            .get(self.cart_cursor)
            .map(|item| item.variant_id.clone())
    }

    /// Adds one to the highlighted cart line.
    pub fn increment_selected(&mut self) {
        if let Some(variant_id) = self.selected_variant() {
            self.cart.increment_quantity(&variant_id);
            self.after_cart_change();
        }
    }

    /// Takes one from the highlighted cart line, removing it at zero.
    pub fn decrement_selected(&mut self) {
        if let Some(variant_id) = self.selected_variant() {
            self.cart.decrement_quantity(&variant_id);
            self.after_cart_change();
        }
    }

    /// Removes the highlighted cart line entirely.
    pub fn remove_selected(&mut self) {
        if let Some(variant_id) = self.selected_variant() {
            self.cart.remove_item(&variant_id);
            self.after_cart_change();
        }
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.status_message = Some("Cart cleared".to_string());
        self.after_cart_change();
    }

    fn after_cart_change(&mut self) {
        self.clamp_cart_cursor();
        self.surface_cart_warning();
    }

    fn clamp_cart_cursor(&mut self) {
        self.cart_cursor = self.cart_cursor.min(self.cart.items().len().saturating_sub(1));
    }

    fn surface_cart_warning(&mut self) {
        if let Some(warning) = self.cart.take_persistence_warning() {
            self.status_message = Some(format!("{} (cart kept for this session only)", warning));
        }
    }
}

fn step_cursor(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}
