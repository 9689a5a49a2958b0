//! Main application UI.
//! Renders decks, study runs, analytics and settings on top of a
//! `StudyContext`, which does all of the bookkeeping and persistence.

use mindflash::clock::FixedClock;
use mindflash::context::DEFAULT_ACTIVITY_DAYS;
use mindflash::models::{Deck, Grade, Scope, Theme, due};
use mindflash::{Result, StudyContext};
use eframe::egui;
use std::rc::Rc;

/// Top-level views, reachable with Alt+1..4.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum View {
    #[default]
    Decks,
    Study,
    Analytics,
    Settings,
}

impl View {
    const ALL: [(View, &'static str); 4] = [
        (View::Decks, "Decks"),
        (View::Study, "Study"),
        (View::Analytics, "Analytics"),
        (View::Settings, "Settings"),
    ];
}

/// Deck being created (`id == None`) or edited.
struct DeckForm {
    id: Option<String>,
    name: String,
    description: String,
}

/// Card being created (`card_id == None`) or edited.
struct CardForm {
    deck_id: String,
    card_id: Option<String>,
    front: String,
    back: String,
}

enum Confirm {
    DeleteDeck { id: String, name: String },
    ResetAll,
    Quit,
}

/// UI events are collected while rendering and applied afterwards, so the
/// render code only needs shared access to the context.
enum Action {
    SwitchView(View),
    SelectDeck(String),
    EditDeck(Option<String>),
    EditCard { deck_id: String, card_id: Option<String> },
    AskDeleteDeck(String),
    DeleteCard { deck_id: String, card_id: String },
    Study(String),
    ShowAnswer,
    Grade(Grade),
    EndSession,
    NextDay,
    SetTheme(Theme),
    ToggleTheme,
    Export,
    Import,
    AskReset,
}

pub struct MyApp {
    library: StudyContext,
    pinned_clock: Option<Rc<FixedClock>>,
    view: View,
    deck_search: String,
    selected_deck: Option<String>,
    study_deck: Option<String>,
    show_answer: bool,
    analytics_scope: Scope,
    deck_form: Option<DeckForm>,
    card_form: Option<CardForm>,
    confirm: Option<Confirm>,
    allowed_to_close: bool,
    message: Option<String>,
    applied_theme: Option<Theme>,
}

impl MyApp {
    pub fn new(library: StudyContext, pinned_clock: Option<Rc<FixedClock>>) -> Self {
        let first_deck = library.decks().first().map(|d| d.id.clone());
        Self {
            library,
            pinned_clock,
            view: View::Decks,
            deck_search: String::new(),
            selected_deck: first_deck.clone(),
            study_deck: first_deck,
            show_answer: false,
            analytics_scope: Scope::All,
            deck_form: None,
            card_form: None,
            confirm: None,
            allowed_to_close: false,
            message: None,
            applied_theme: None,
        }
    }

    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("{e}");
                self.message = Some(e.to_string());
                None
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::SwitchView(view) => {
                if view != View::Study {
                    // Leaving the study view abandons the run.
                    self.library.end_session();
                }
                self.view = view;
            }
            Action::SelectDeck(id) => self.selected_deck = Some(id),
            Action::EditDeck(id) => {
                let existing = id.as_deref().and_then(|id| self.library.deck(id).ok());
                self.deck_form = Some(DeckForm {
                    name: existing.map(|d| d.name.clone()).unwrap_or_default(),
                    description: existing.map(|d| d.description.clone()).unwrap_or_default(),
                    id,
                });
            }
            Action::EditCard { deck_id, card_id } => {
                let existing = card_id.as_deref().and_then(|cid| {
                    self.library.deck(&deck_id).ok().and_then(|d| d.card(cid))
                });
                self.card_form = Some(CardForm {
                    front: existing.map(|c| c.front.clone()).unwrap_or_default(),
                    back: existing.map(|c| c.back.clone()).unwrap_or_default(),
                    deck_id,
                    card_id,
                });
            }
            Action::AskDeleteDeck(id) => {
                if let Ok(deck) = self.library.deck(&id) {
                    self.confirm = Some(Confirm::DeleteDeck {
                        name: deck.name.clone(),
                        id,
                    });
                }
            }
            Action::DeleteCard { deck_id, card_id } => {
                let result = self.library.delete_card(&deck_id, &card_id);
                self.report(result);
            }
            Action::Study(deck_id) => {
                self.view = View::Study;
                self.show_answer = false;
                let result = self.library.start_study(&deck_id).map(|_| ());
                if self.report(result).is_some() {
                    self.study_deck = Some(deck_id);
                }
            }
            Action::ShowAnswer => self.show_answer = true,
            Action::Grade(grade) => {
                let result = self.library.grade_current(grade);
                self.report(result);
                self.show_answer = false;
            }
            Action::EndSession => self.library.end_session(),
            Action::NextDay => {
                if let Some(clock) = &self.pinned_clock {
                    clock.advance_days(1);
                    tracing::info!(today = %self.library.today(), "advanced one day");
                }
            }
            Action::SetTheme(theme) => {
                let result = self.library.set_theme(theme);
                self.report(result);
            }
            Action::ToggleTheme => {
                let result = self.library.toggle_theme();
                self.report(result);
            }
            Action::Export => self.handle_export(),
            Action::Import => self.handle_import(),
            Action::AskReset => self.confirm = Some(Confirm::ResetAll),
        }
    }

    fn sync_theme(&mut self, ctx: &egui::Context) {
        let theme = self.library.prefs().theme;
        if self.applied_theme == Some(theme) {
            return;
        }
        ctx.set_theme(match theme {
            Theme::System => egui::ThemePreference::System,
            Theme::Light => egui::ThemePreference::Light,
            Theme::Dark => egui::ThemePreference::Dark,
        });
        self.applied_theme = Some(theme);
    }

    /// Alt+1..4 switch views, T cycles the theme. In a running session Space
    /// reveals the answer and 1-4 grade it (N is a shortcut for good).
    fn shortcuts(&self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();
        if ctx.wants_keyboard_input() {
            return actions;
        }
        let studying = self.view == View::Study && self.library.current_card().is_some();

        ctx.input(|i| {
            let number_keys = [
                egui::Key::Num1,
                egui::Key::Num2,
                egui::Key::Num3,
                egui::Key::Num4,
            ];
            if i.modifiers.alt {
                for (key, (view, _)) in number_keys.iter().zip(View::ALL) {
                    if i.key_pressed(*key) {
                        actions.push(Action::SwitchView(view));
                    }
                }
                return;
            }
            if i.key_pressed(egui::Key::T) {
                actions.push(Action::ToggleTheme);
                return;
            }
            if !studying {
                return;
            }
            if !self.show_answer {
                if i.key_pressed(egui::Key::Space) {
                    actions.push(Action::ShowAnswer);
                }
                return;
            }
            for (key, grade) in number_keys.iter().zip(Grade::ALL) {
                if i.key_pressed(*key) {
                    actions.push(Action::Grade(grade));
                }
            }
            if i.key_pressed(egui::Key::N) {
                actions.push(Action::Grade(Grade::Good));
            }
        });
        actions
    }

    fn render_header(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            for (view, label) in View::ALL {
                if ui.selectable_label(self.view == view, label).clicked() {
                    actions.push(Action::SwitchView(view));
                }
            }
            ui.separator();
            ui.label(self.library.today().format("%Y-%m-%d").to_string());
            if self.pinned_clock.is_some() && ui.button("Next Day").clicked() {
                actions.push(Action::NextDay);
            }
            if ui
                .button(format!("Theme: {}", self.library.prefs().theme.label()))
                .clicked()
            {
                actions.push(Action::ToggleTheme);
            }
        });
        ui.separator();
    }

    /// Renders the deck list with card management for the selected deck
    fn render_decks(&self, ui: &mut egui::Ui, search: &mut String, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(search);
            if ui.button("New Deck").clicked() {
                actions.push(Action::EditDeck(None));
            }
        });

        let today = self.library.today();
        let decks = self.library.filter_decks(search);
        ui.heading(format!("Decks ({})", decks.len()));
        if decks.is_empty() {
            ui.label("No decks yet. Create one to get started.");
        }

        egui::ScrollArea::vertical()
            .id_source("decks_list")
            .max_height(260.0)
            .show(ui, |ui| {
                for deck in decks {
                    let is_selected = self.selected_deck.as_deref() == Some(deck.id.as_str());
                    ui.group(|ui| {
                        if ui.selectable_label(is_selected, &deck.name).clicked() {
                            actions.push(Action::SelectDeck(deck.id.clone()));
                        }
                        if !deck.description.is_empty() {
                            ui.label(&deck.description);
                        }
                        ui.label(format!(
                            "{} cards · Due: {} · Created: {}",
                            deck.cards.len(),
                            due::due_count(deck, today),
                            deck.created_at.format("%Y-%m-%d")
                        ));
                        ui.horizontal(|ui| {
                            if ui.button("Add Card").clicked() {
                                actions.push(Action::EditCard {
                                    deck_id: deck.id.clone(),
                                    card_id: None,
                                });
                            }
                            if ui.button("Edit").clicked() {
                                actions.push(Action::EditDeck(Some(deck.id.clone())));
                            }
                            if ui.button("Delete").clicked() {
                                actions.push(Action::AskDeleteDeck(deck.id.clone()));
                            }
                            if ui.button("Study").clicked() {
                                actions.push(Action::Study(deck.id.clone()));
                            }
                        });
                    });
                }
            });

        ui.separator();

        let Some(deck) = self
            .selected_deck
            .as_deref()
            .and_then(|id| self.library.deck(id).ok())
        else {
            ui.label("Select a deck to manage its cards");
            return;
        };
        self.render_cards(ui, deck, actions);
    }

    fn render_cards(&self, ui: &mut egui::Ui, deck: &Deck, actions: &mut Vec<Action>) {
        ui.heading(format!("{}: {} cards", deck.name, deck.cards.len()));
        egui::ScrollArea::vertical()
            .id_source("cards_list")
            .show(ui, |ui| {
                for (i, card) in deck.cards.iter().enumerate() {
                    ui.group(|ui| {
                        ui.label(format!("{}. {}", i + 1, card.front));
                        ui.label(format!("   {}", card.back));
                        ui.horizontal(|ui| {
                            ui.small(format!(
                                "Box {} · Ease {} · Reviewed {}× · Due {}",
                                card.leitner_box,
                                card.ease,
                                card.times_reviewed,
                                card.next_due
                                    .map_or_else(|| "now".to_string(), |d| d.to_string())
                            ));
                            if ui.small_button("Edit").clicked() {
                                actions.push(Action::EditCard {
                                    deck_id: deck.id.clone(),
                                    card_id: Some(card.id.clone()),
                                });
                            }
                            if ui.small_button("Delete").clicked() {
                                actions.push(Action::DeleteCard {
                                    deck_id: deck.id.clone(),
                                    card_id: card.id.clone(),
                                });
                            }
                        });
                    });
                }
            });
    }

    /// Renders the study screen: deck picker, then one card at a time
    fn render_study(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            let selected_name = self
                .study_deck
                .as_deref()
                .and_then(|id| self.library.deck(id).ok())
                .map_or("Choose a deck", |d| d.name.as_str())
                .to_string();
            egui::ComboBox::from_id_source("study_deck")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for deck in self.library.decks() {
                        ui.selectable_value(&mut self.study_deck, Some(deck.id.clone()), &deck.name);
                    }
                });
            if ui.button("Start").clicked() {
                match &self.study_deck {
                    Some(id) => actions.push(Action::Study(id.clone())),
                    None => self.message = Some("Please create a deck first.".to_string()),
                }
            }
        });
        ui.separator();

        let Some(session) = self.library.session() else {
            ui.label("Pick a deck and press Start.");
            return;
        };
        if let Ok(deck) = self.library.deck(session.deck_id()) {
            ui.heading(&deck.name);
        }
        ui.label(format!(
            "Due: {} · Session: {}",
            self.library.session_due_count(),
            session.reviewed()
        ));
        ui.add_space(20.0);

        let Some(card) = self.library.current_card() else {
            ui.heading("All done!");
            ui.label("No more cards are due in this deck today.");
            if ui.button("Close session").clicked() {
                actions.push(Action::EndSession);
            }
            return;
        };

        ui.group(|ui| {
            ui.set_min_height(200.0);
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(&card.front);
                ui.add_space(20.0);
                if self.show_answer {
                    ui.label(&card.back);
                } else {
                    ui.label("(Space to reveal)");
                }
                ui.add_space(20.0);
            });
        });
        ui.add_space(20.0);

        if !self.show_answer {
            if ui.button("Show Answer").clicked() {
                actions.push(Action::ShowAnswer);
            }
            return;
        }
        ui.horizontal(|ui| {
            for (n, grade) in Grade::ALL.into_iter().enumerate() {
                if ui.button(format!("{} - {}", n + 1, grade)).clicked() {
                    actions.push(Action::Grade(grade));
                }
            }
        });
    }

    /// Renders counters, the review activity chart and the box distribution
    fn render_analytics(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let selected = match &self.analytics_scope {
                Scope::All => "All Decks".to_string(),
                Scope::Deck(id) => self
                    .library
                    .deck(id)
                    .map_or_else(|_| "All Decks".to_string(), |d| d.name.clone()),
            };
            egui::ComboBox::from_id_source("analytics_scope")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.analytics_scope, Scope::All, "All Decks");
                    for deck in self.library.decks() {
                        ui.selectable_value(
                            &mut self.analytics_scope,
                            Scope::Deck(deck.id.clone()),
                            &deck.name,
                        );
                    }
                });
        });

        // A deleted deck falls back to the whole library.
        if self.library.stats(&self.analytics_scope).is_err() {
            self.analytics_scope = Scope::All;
        }
        let (Ok(stats), Ok(boxes)) = (
            self.library.stats(&self.analytics_scope),
            self.library.box_distribution(&self.analytics_scope),
        ) else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(format!("Total: {}", stats.total));
            ui.label(format!("Due today: {}", stats.due_today));
            ui.label(format!("Streak: {}", stats.streak));
            ui.label(format!("Mastered: {}", stats.mastered));
        });
        ui.separator();

        ui.heading(format!("Reviews, last {DEFAULT_ACTIVITY_DAYS} days"));
        let reviews = self.library.reviews_last_n_days(DEFAULT_ACTIVITY_DAYS);
        let max = reviews.iter().map(|(_, c)| *c as usize).max().unwrap_or(0);
        for (day, count) in &reviews {
            bar(ui, &day.format("%m-%d").to_string(), *count as usize, max, egui::Color32::LIGHT_BLUE);
        }
        ui.separator();

        ui.heading("Cards per box");
        for (b, count) in boxes.iter() {
            bar(ui, &format!("Box {b}"), count, boxes.max(), box_color(b));
        }
    }

    fn render_settings(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Theme");
        ui.horizontal(|ui| {
            for theme in [Theme::System, Theme::Light, Theme::Dark] {
                if ui
                    .selectable_label(self.library.prefs().theme == theme, theme.label())
                    .clicked()
                {
                    actions.push(Action::SetTheme(theme));
                }
            }
        });
        ui.separator();

        ui.heading("Data");
        ui.horizontal(|ui| {
            if ui.button("Export backup").clicked() {
                actions.push(Action::Export);
            }
            if ui.button("Import backup").clicked() {
                actions.push(Action::Import);
            }
            if ui.button("Erase everything").clicked() {
                actions.push(Action::AskReset);
            }
        });
    }

    fn render_deck_form(&mut self, ctx: &egui::Context) {
        let Some(form) = &mut self.deck_form else {
            return;
        };
        let mut save = false;
        let mut cancel = false;
        let title = if form.id.is_some() { "Edit Deck" } else { "New Deck" };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.text_edit_singleline(&mut form.name);
                });
                ui.horizontal(|ui| {
                    ui.label("Description:");
                    ui.text_edit_singleline(&mut form.description);
                });
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if save {
            let Some(form) = self.deck_form.take() else {
                return;
            };
            let result = match &form.id {
                Some(id) => self.library.update_deck(id, &form.name, &form.description),
                None => self.library.create_deck(&form.name, &form.description),
            };
            match result {
                Ok(deck) => self.selected_deck = Some(deck.id),
                Err(e) => {
                    self.message = Some(e.to_string());
                    self.deck_form = Some(form);
                }
            }
        } else if cancel {
            self.deck_form = None;
        }
    }

    fn render_card_form(&mut self, ctx: &egui::Context) {
        let Some(form) = &mut self.card_form else {
            return;
        };
        let mut save = false;
        let mut cancel = false;
        let title = if form.card_id.is_some() { "Edit Card" } else { "New Card" };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Front:");
                ui.text_edit_multiline(&mut form.front);
                ui.label("Back:");
                ui.text_edit_multiline(&mut form.back);
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if save {
            let Some(form) = self.card_form.take() else {
                return;
            };
            let result = match &form.card_id {
                Some(card_id) => {
                    self.library
                        .update_card(&form.deck_id, card_id, &form.front, &form.back)
                }
                None => self.library.create_card(&form.deck_id, &form.front, &form.back),
            };
            if let Err(e) = result {
                self.message = Some(e.to_string());
                self.card_form = Some(form);
            }
        } else if cancel {
            self.card_form = None;
        }
    }

    fn render_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = &self.confirm else {
            return;
        };
        let (title, question) = match confirm {
            Confirm::DeleteDeck { name, .. } => (
                "Delete deck",
                format!("Delete deck \"{name}\" and all its cards?"),
            ),
            Confirm::ResetAll => (
                "Erase everything",
                "This will erase all decks, cards, and analytics. Continue?".to_string(),
            ),
            Confirm::Quit => ("Do you want to quit?", String::new()),
        };

        let mut answer = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if !question.is_empty() {
                    ui.label(&question);
                }
                ui.horizontal(|ui| {
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                });
            });

        let Some(yes) = answer else {
            return;
        };
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        if !yes {
            return;
        }
        match confirm {
            Confirm::DeleteDeck { id, .. } => {
                let result = self.library.delete_deck(&id);
                self.report(result);
                if self.selected_deck.as_deref() == Some(id.as_str()) {
                    self.selected_deck = None;
                }
                if self.study_deck.as_deref() == Some(id.as_str()) {
                    self.study_deck = None;
                }
            }
            Confirm::ResetAll => {
                let result = self.library.reset_all();
                self.report(result);
                self.selected_deck = None;
                self.study_deck = None;
                self.analytics_scope = Scope::All;
            }
            Confirm::Quit => {
                self.allowed_to_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// Handles backup export to a JSON file
    fn handle_export(&mut self) {
        let file_name = format!("mindflash-backup-{}.json", self.library.today());
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(file_name)
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            self.message = Some(match self.library.export_json_to_path(&path) {
                Ok(()) => format!("Backup saved to {}", path.display()),
                Err(e) => format!("Export failed: {e}"),
            });
        }
    }

    /// Handles backup import from a JSON file
    fn handle_import(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            self.message = Some(match self.library.import_json(&path) {
                Ok(()) => {
                    self.selected_deck = self.library.decks().first().map(|d| d.id.clone());
                    self.study_deck = self.selected_deck.clone();
                    format!("Import successful! {} decks loaded.", self.library.decks().len())
                }
                Err(e) => format!("Failed to import: {e}"),
            });
        }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_theme(ctx);

        let mut actions = self.shortcuts(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui, &mut actions);
            match self.view {
                View::Decks => {
                    let mut search = std::mem::take(&mut self.deck_search);
                    self.render_decks(ui, &mut search, &mut actions);
                    self.deck_search = search;
                }
                View::Study => self.render_study(ui, &mut actions),
                View::Analytics => self.render_analytics(ui),
                View::Settings => self.render_settings(ui, &mut actions),
            }
        });
        for action in actions {
            self.apply(action);
        }

        self.render_deck_form(ctx);
        self.render_card_form(ctx);

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm = Some(Confirm::Quit);
        }
        self.render_confirm(ctx);

        if let Some(message) = self.message.clone() {
            egui::Window::new("MindFlash")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.message = None;
                    }
                });
        }
    }
}

/// One labelled horizontal bar scaled against `max`.
fn bar(ui: &mut egui::Ui, label: &str, value: usize, max: usize, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized([60.0, 16.0], egui::Label::new(label));
        let full = 300.0;
        let width = if max == 0 { 0.0 } else { full * value as f32 / max as f32 };
        let (rect, _) = ui.allocate_exact_size(egui::vec2(full, 12.0), egui::Sense::hover());
        let filled = egui::Rect::from_min_size(rect.min, egui::vec2(width, rect.height()));
        ui.painter().rect_filled(filled, 2.0, color);
        ui.label(value.to_string());
    });
}

fn box_color(leitner_box: u8) -> egui::Color32 {
    match leitner_box {
        1 => egui::Color32::from_rgb(0xff, 0x8b, 0x8b),
        2 => egui::Color32::from_rgb(0xff, 0xc0, 0x7a),
        3 => egui::Color32::from_rgb(0xff, 0xe2, 0x7a),
        4 => egui::Color32::from_rgb(0xa6, 0xe3, 0xa1),
        _ => egui::Color32::from_rgb(0x84, 0xc5, 0xff),
    }
}
