use crate::config::{AppConfig, Theme};
use crate::models::events::AuthMode;
use crate::models::poll::Poll;
use egui::{Align, Color32, Layout, RichText};
use state::{AppState, ViewState};
use std::time::Duration;

pub mod state;

const ACCENT: Color32 = Color32::from_rgb(229, 181, 103);
const ERROR: Color32 = Color32::from_rgb(230, 90, 90);
const SUCCESS: Color32 = Color32::from_rgb(120, 200, 120);
const THANK_YOU: &str = "Thank you! Your vote has been counted.";

enum Action {
    Select { question_id: u64, choice_id: u64 },
    Submit,
    OpenAuth,
    Logout,
    SubmitAuth,
    CloseAuth,
    DismissNotice,
}

pub struct PollApp {
    state: AppState,
    title: String,
}

impl PollApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig, mut state: AppState) -> Self {
        apply_theme(&cc.egui_ctx, config.theme);
        state.init();
        Self {
            state,
            title: config.window_title.clone(),
        }
    }
}

pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let flavor = match theme {
        Theme::Mocha => catppuccin_egui::MOCHA,
        Theme::Latte => catppuccin_egui::LATTE,
    };
    catppuccin_egui::set_theme(ctx, flavor);
}

impl eframe::App for PollApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui_main(ctx, &mut self.state, &self.title);
    }
}

pub fn ui_main(ctx: &egui::Context, state: &mut AppState, title: &str) {
    state.process_events();

    let mut actions = Vec::new();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        egui::Frame::default()
            .outer_margin(egui::vec2(0.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                        ui.heading(RichText::new(title).color(ACCENT));
                    });

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        match state.username() {
                            Some(username) => {
                                if ui.button("Logout").clicked() {
                                    actions.push(Action::Logout);
                                }
                                ui.label(format!("Hello, {}", username));
                            }
                            None => {
                                if ui.button("Login").clicked() {
                                    actions.push(Action::OpenAuth);
                                }
                            }
                        }
                    });
                });
            });
    });

    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Status: {}",
                match state.view_state() {
                    ViewState::Guest => "Guest",
                    ViewState::AuthenticatedNotVoted => "Signed in",
                    ViewState::AuthenticatedVoted => "Voted",
                }
            ));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if state.is_busy() {
                    ui.spinner();
                }
                ui.label(&state.status_message);
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if state.polls().is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        if state.is_loading() {
                            ui.label("Loading polls...");
                        } else {
                            ui.label("No polls available.");
                        }
                    });
                    return;
                }

                for poll in state.polls() {
                    poll_card(ui, &*state, poll, &mut actions);
                    ui.add_space(12.0);
                }

                match state.view_state() {
                    ViewState::AuthenticatedNotVoted => {
                        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                            let label = if state.is_submitting() {
                                "Sending..."
                            } else {
                                "Submit our opinion"
                            };
                            if ui
                                .add_enabled(state.can_submit(), egui::Button::new(label))
                                .clicked()
                            {
                                actions.push(Action::Submit);
                            }
                        });
                    }
                    ViewState::AuthenticatedVoted => {}
                    ViewState::Guest => {
                        ui.label(RichText::new("Log in to take part in the poll.").weak());
                    }
                }
            });
    });

    if state.auth_form.open {
        auth_window(ctx, state, &mut actions);
    }

    if let Some(notice) = &state.notice {
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let color = if notice.is_error { ERROR } else { SUCCESS };
                ui.label(RichText::new(&notice.message).color(color));
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    actions.push(Action::DismissNotice);
                }
            });
    }

    for action in actions {
        match action {
            Action::Select {
                question_id,
                choice_id,
            } => {
                state.select(question_id, choice_id);
            }
            Action::Submit => {
                state.submit();
            }
            Action::OpenAuth => state.open_auth(AuthMode::Login),
            Action::Logout => state.logout(),
            Action::SubmitAuth => state.submit_auth(),
            Action::CloseAuth => state.close_auth(),
            Action::DismissNotice => state.dismiss_notice(),
        }
    }

    if state.is_busy() {
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn poll_card(ui: &mut egui::Ui, state: &AppState, poll: &Poll, actions: &mut Vec<Action>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading(&poll.title);
        if let Some(created) = poll.date_created {
            ui.label(RichText::new(created.format("%Y-%m-%d").to_string()).weak());
        }

        for question in &poll.questions {
            ui.add_space(8.0);
            ui.label(RichText::new(&question.text).strong());
            for choice in &question.choices {
                let selected = state.selected(question.id) == Some(choice.id);
                let mut text = choice.text.clone();
                if state.shows_stats() && choice.has_my_vote() {
                    text.push_str("  ✓ your choice");
                } else if !state.has_voted() && selected {
                    text.push_str("  ← selected");
                }

                ui.horizontal(|ui| {
                    let response = ui.add_enabled(
                        state.is_clickable(choice),
                        egui::SelectableLabel::new(selected, text),
                    );
                    if response.clicked() {
                        actions.push(Action::Select {
                            question_id: question.id,
                            choice_id: choice.id,
                        });
                    }

                    if state.shows_stats() {
                        if let Some(count) = choice.vote_count {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(
                                    RichText::new(format!(
                                        "{} votes ({:.1}%)",
                                        count,
                                        choice.percentage.unwrap_or(0.0)
                                    ))
                                    .weak(),
                                );
                            });
                        }
                    }
                });
            }
        }

        if let Some(banner) = card_banner(state) {
            ui.add_space(8.0);
            ui.label(RichText::new(banner).color(SUCCESS));
        }
    });
}

/// Closing line of every poll card once the user has voted.
fn card_banner(state: &AppState) -> Option<&'static str> {
    (state.view_state() == ViewState::AuthenticatedVoted).then_some(THANK_YOU)
}

fn auth_window(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<Action>) {
    let mut open = true;
    let form = &mut state.auth_form;
    egui::Window::new("Authorization")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut form.mode, AuthMode::Login, "Login");
                ui.selectable_value(&mut form.mode, AuthMode::Register, "Register");
            });
            ui.separator();

            egui::Grid::new("auth_grid").num_columns(2).show(ui, |ui| {
                ui.label("Username:");
                ui.text_edit_singleline(&mut form.username);
                ui.end_row();

                ui.label("Password:");
                let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    actions.push(Action::SubmitAuth);
                }
                ui.end_row();
            });

            if let Some(error) = &form.error {
                ui.colored_label(ERROR, error);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if form.pending { "Please wait..." } else { form.mode.label() };
                if ui
                    .add_enabled(!form.pending, egui::Button::new(label))
                    .clicked()
                {
                    actions.push(Action::SubmitAuth);
                }
            });
        });

    if !open {
        actions.push(Action::CloseAuth);
    }
}
