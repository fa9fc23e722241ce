use crate::application::{App, AppMode, CatalogStatus, QuizStep};
use crate::domain::Category;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.base_mode {
        AppMode::Catalog => render_catalog(f, app, chunks[1]),
        _ => render_quiz(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    match app.mode {
        AppMode::Cart => render_cart_drawer(f, app),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Quiz | AppMode::Catalog => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut title = format!("skinshop | Cart: {} item(s)", app.cart.total_count());
    if let Some(result) = app.quiz.result() {
        title.push_str(&format!(" | Your type: {}", result.profile().label));
    }
    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn option_list<'a>(items: Vec<ListItem<'a>>, title: String) -> List<'a> {
    List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ")
}

fn render_quiz(f: &mut Frame, app: &App, area: Rect) {
    match app.quiz.step() {
        QuizStep::Initial => {
            let items = vec![
                ListItem::new("Yes, I know my skin type"),
                ListItem::new("No, help me find out"),
            ];
            let list = option_list(items, "Do you know your skin type?".to_string());
            let mut state = ListState::default().with_selected(Some(app.option_cursor));
            f.render_stateful_widget(list, area, &mut state);
        }
        QuizStep::SelectType => {
            let items = Category::ALL
                .iter()
                .enumerate()
                .map(|(i, category)| {
                    let profile = category.profile();
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format!("{}. {}", i + 1, profile.label),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(format!("   {}", profile.description)),
                    ])
                })
                .collect();
            let list = option_list(items, "Select your skin type (Esc to go back)".to_string());
            let mut state = ListState::default().with_selected(Some(app.option_cursor));
            f.render_stateful_widget(list, area, &mut state);
        }
        QuizStep::InProgress { .. } => render_question(f, app, area),
        QuizStep::Finished { result } => render_result(f, result, area),
    }
}

fn render_question(f: &mut Frame, app: &App, area: Rect) {
    let Some(question) = app.quiz.current_question() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let (position, total) = app.quiz.progress().unwrap_or((0, 0));
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(app.quiz.progress_percent().unwrap_or(0))
        .label(format!("Question {} of {}", position, total));
    f.render_widget(gauge, chunks[0]);

    let prompt = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(prompt, chunks[1]);

    let recorded = app.quiz.current_answer();
    let items = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = if recorded == Some(option.category) { "(*)" } else { "( )" };
            ListItem::new(format!("{} {}. {}", marker, i + 1, option.text))
        })
        .collect();
    let next_label = if app.quiz.is_last_question() { "Finish" } else { "Next" };
    let list = option_list(items, format!("Answers | ←/p: Previous | →/n: {}", next_label));
    let mut state = ListState::default().with_selected(Some(app.option_cursor));
    f.render_stateful_widget(list, chunks[2], &mut state);
}

fn render_result(f: &mut Frame, result: Category, area: Rect) {
    let profile = result.profile();
    let text = vec![
        Line::from(Span::styled(
            format!("Your skin type: {}", profile.label),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(profile.description),
        Line::from(""),
        Line::from("Enter: shop products for your skin | r: take the quiz again | s: browse all"),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(paragraph, area);
}

fn render_catalog(f: &mut Frame, app: &App, area: Rect) {
    let blurb_height = if app.catalog.blurb().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(blurb_height), Constraint::Min(0)])
        .split(area);

    if let Some(blurb) = app.catalog.blurb() {
        let paragraph = Paragraph::new(blurb)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, chunks[0]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.catalog.headline());

    let message = match app.catalog.status() {
        CatalogStatus::Idle | CatalogStatus::Loading => Some("Loading products...".to_string()),
        CatalogStatus::Failed(e) => Some(format!("Error loading products: {}\n\nPress r to retry.", e)),
        CatalogStatus::Loaded(products) if products.is_empty() => {
            Some("No products found.".to_string())
        }
        CatalogStatus::Loaded(_) => None,
    };
    if let Some(message) = message {
        f.render_widget(Paragraph::new(message).block(block), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .catalog
        .products()
        .iter()
        .map(|product| {
            let price = product
                .first_variant()
                .map(|variant| variant.price.to_string())
                .unwrap_or_else(|| product.price_range.min.to_string());
            let mut spans = vec![
                Span::styled(product.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {}", price)),
            ];
            if !product.is_available() {
                spans.push(Span::styled("  Out of Stock", Style::default().fg(Color::Red)));
            }
            if app.catalog.is_recommended(product) {
                spans.push(Span::styled("  * Recommended", Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.product_cursor));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_cart_drawer(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = (area.width / 2).max(40).min(area.width);
    let drawer = Rect {
        x: area.width - width,
        y: 1,
        width,
        height: area.height.saturating_sub(1),
    };
    f.render_widget(Clear, drawer);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(drawer);

    let title = format!("Your Cart ({})", app.cart.total_count());
    if app.cart.is_empty() {
        let empty = Paragraph::new("Your cart is empty")
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .cart
            .items()
            .iter()
            .map(|item| {
                let mut lines = vec![Line::from(Span::styled(
                    item.product.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                if !item.selected_options.is_empty() {
                    let options: Vec<String> = item
                        .selected_options
                        .iter()
                        .map(|option| format!("{}: {}", option.name, option.value))
                        .collect();
                    lines.push(Line::from(format!("  {}", options.join(", "))));
                }
                lines.push(Line::from(format!(
                    "  {} x {} = {}",
                    item.quantity,
                    item.unit_price,
                    item.line_total()
                )));
                ListItem::new(lines)
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
        let mut state = ListState::default().with_selected(Some(app.cart_cursor));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    let totals: Vec<String> = app
        .cart
        .totals_by_currency()
        .iter()
        .map(|total| total.to_string())
        .collect();
    let summary = if totals.is_empty() {
        "Total: -".to_string()
    } else {
        format!("Total: {}", totals.join(" + "))
    };
    let footer = Paragraph::new(vec![
        Line::from(summary),
        Line::from("+/-: quantity | d: remove | x: clear | Esc: close"),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[1]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.mode {
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Cart => "↑↓/jk: select | +/-: quantity | d: remove | x: clear | Esc/c: close".to_string(),
        _ => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else if app.mode == AppMode::Catalog {
                "↑↓/jk: select | Enter/a: add to cart | r: reload | Esc/b: back | c: cart | ?: help | q: quit".to_string()
            } else {
                "↑↓/jk: select | Enter: confirm | 1-5: answer | s: browse all | c: cart | ?: help | q: quit".to_string()
            }
        }
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Quiz => Style::default(),
            AppMode::Catalog => Style::default().fg(Color::Yellow),
            AppMode::Cart => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(status, area);
}

/// A rectangle covering `percent` of `area` in both directions, centred.
fn centered_rect(percent: u16, area: Rect) -> Rect {
    let margin = (100 - percent) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin),
            Constraint::Percentage(percent),
            Constraint::Percentage(margin),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin),
            Constraint::Percentage(percent),
            Constraint::Percentage(margin),
        ])
        .split(rows[1])[1]
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let popup_area = centered_rect(80, f.area());
    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let line_count = help_text.lines().count();
    let visible_height = popup_area.height.saturating_sub(2) as usize;
    let top = scroll.min(line_count.saturating_sub(visible_height));

    let help_widget = Paragraph::new(help_text)
        .scroll((top.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("skinshop Help ({}/{})", top + 1, line_count))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"SKINSHOP HELP

=== THE QUIZ ===
Answer ten questions about how your skin behaves. Each answer points to
one of five skin types: dry, oily, combination, normal or sensitive.
The type picked most often wins; a tie goes to the type listed first.
If you already know your type, answer "Yes" on the first screen and
pick it directly.

=== QUIZ KEYS ===
↑↓ or j/k       Move between answers
Enter           Choose the highlighted answer and continue
1-5             Pick an answer by number
Space           Pick the highlighted answer without moving on
→ or n          Next question (needs an answer)
← or p          Previous question
r               Start over
s               Browse all products

=== PRODUCTS ===
After the quiz, Enter opens products for your skin type. Products whose
names match your type are marked "Recommended".
↑↓ or j/k       Move between products
Enter or a      Add the product to your cart
r               Reload products
Esc, b or ←     Back to the quiz

=== CART ===
c               Open or close the cart
+ / -           Change the quantity of the selected line
d or Delete     Remove the selected line
x               Empty the cart
                The cart is saved between sessions. If it cannot be
                saved, it is kept until you quit.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

q               Quit application"#.to_string()
}
