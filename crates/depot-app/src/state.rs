// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ConfirmDialog, EntityKind, InventoryAdjustmentInput, Notice, PageWindowMode, RowKey};

pub const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { kind: EntityKind, keys: Vec<RowKey> },
    Confirm { kind: EntityKind, keys: Vec<RowKey> },
    Adjust(InventoryAdjustmentInput),
}

impl PendingAction {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "delete",
            Self::Confirm { .. } => "confirm",
            Self::Adjust(_) => "adjust",
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Delete { kind, .. } | Self::Confirm { kind, .. } => *kind,
            Self::Adjust(_) => EntityKind::Inventory,
        }
    }

    pub fn keys(&self) -> Vec<RowKey> {
        match self {
            Self::Delete { keys, .. } | Self::Confirm { keys, .. } => keys.clone(),
            Self::Adjust(input) => vec![input.key()],
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Self::Delete { kind, keys } | Self::Confirm { kind, keys } => format!(
                "{} {} selected {}? (y/n)",
                self.verb(),
                keys.len(),
                kind.label()
            ),
            Self::Adjust(input) => format!(
                "adjust inventory {} by {}? (y/n)",
                input.inventory_id, input.quantity
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: EntityKind,
    pub status_line: Option<String>,
    pub notices: Vec<Notice>,
    pub confirm: ConfirmDialog<PendingAction>,
    pub page_window: PageWindowMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: EntityKind::Asn,
            status_line: None,
            notices: Vec::new(),
            confirm: ConfirmDialog::new(),
            page_window: PageWindowMode::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextScreen,
    PrevScreen,
    Notify(Notice),
    SetStatus(String),
    ClearStatus,
    Request(PendingAction),
    ConfirmPending,
    CancelPending,
    SetPageWindow(PageWindowMode),
    TogglePageWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(EntityKind),
    Noticed(Notice),
    StatusUpdated(String),
    StatusCleared,
    ConfirmOpened(String),
    Confirmed(PendingAction),
    Cancelled,
    PageWindowChanged(PageWindowMode),
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextScreen => self.rotate_screen(1),
            AppCommand::PrevScreen => self.rotate_screen(-1),
            AppCommand::Notify(notice) => {
                let status = self.set_status(&notice.message);
                self.notices.push(notice.clone());
                if self.notices.len() > MAX_NOTICES {
                    let overflow = self.notices.len() - MAX_NOTICES;
                    self.notices.drain(..overflow);
                }
                vec![AppEvent::Noticed(notice), status]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
            AppCommand::Request(action) => {
                let prompt = action.prompt();
                self.confirm.request(action);
                vec![
                    AppEvent::ConfirmOpened(prompt.clone()),
                    self.set_status(&prompt),
                ]
            }
            AppCommand::ConfirmPending => match self.confirm.confirm() {
                Some(action) => {
                    self.status_line = None;
                    vec![AppEvent::Confirmed(action), AppEvent::StatusCleared]
                }
                None => Vec::new(),
            },
            AppCommand::CancelPending => {
                if !self.confirm.is_open() {
                    return Vec::new();
                }
                self.confirm.cancel();
                vec![AppEvent::Cancelled, self.set_status("cancelled")]
            }
            AppCommand::SetPageWindow(mode) => self.set_page_window(mode),
            AppCommand::TogglePageWindow => self.set_page_window(self.page_window.toggled()),
        }
    }

    fn set_page_window(&mut self, mode: PageWindowMode) -> Vec<AppEvent> {
        self.page_window = mode;
        vec![
            AppEvent::PageWindowChanged(mode),
            self.set_status(&format!("pages: {}", mode.as_str())),
        ]
    }

    fn rotate_screen(&mut self, delta: isize) -> Vec<AppEvent> {
        let screens = EntityKind::ALL;
        let current = screens
            .iter()
            .position(|screen| *screen == self.screen)
            .unwrap_or(0) as isize;
        let len = screens.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.screen = screens[next];
        vec![AppEvent::ScreenChanged(self.screen)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, MAX_NOTICES, PendingAction};
    use crate::{
        AdjustDirection, EntityKind, InventoryAdjustmentInput, InventoryId, Notice,
        PageWindowMode, RowKey,
    };

    #[test]
    fn screen_rotation_wraps() {
        let mut state = AppState {
            screen: EntityKind::Location,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextScreen);
        assert_eq!(state.screen, EntityKind::Asn);
        assert_eq!(events, vec![AppEvent::ScreenChanged(EntityKind::Asn)]);

        state.dispatch(AppCommand::PrevScreen);
        assert_eq!(state.screen, EntityKind::Location);
    }

    #[test]
    fn delete_request_goes_through_confirm() {
        let mut state = AppState::default();
        let action = PendingAction::Delete {
            kind: EntityKind::Pallet,
            keys: vec![RowKey::from("4"), RowKey::from("9")],
        };

        let opened = state.dispatch(AppCommand::Request(action.clone()));
        assert!(state.confirm.is_open());
        assert_eq!(
            opened[0],
            AppEvent::ConfirmOpened("delete 2 selected pallets? (y/n)".to_owned())
        );

        let confirmed = state.dispatch(AppCommand::ConfirmPending);
        assert_eq!(
            confirmed,
            vec![AppEvent::Confirmed(action), AppEvent::StatusCleared]
        );
        assert!(!state.confirm.is_open());
        assert!(state.dispatch(AppCommand::ConfirmPending).is_empty());
    }

    #[test]
    fn cancel_only_reports_when_open() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::CancelPending).is_empty());

        state.dispatch(AppCommand::Request(PendingAction::Confirm {
            kind: EntityKind::Asn,
            keys: vec![RowKey::from("1")],
        }));
        let events = state.dispatch(AppCommand::CancelPending);
        assert_eq!(
            events,
            vec![
                AppEvent::Cancelled,
                AppEvent::StatusUpdated("cancelled".to_owned()),
            ]
        );
    }

    #[test]
    fn adjustment_targets_its_inventory_row() {
        let action = PendingAction::Adjust(InventoryAdjustmentInput {
            inventory_id: InventoryId::new(31),
            direction: AdjustDirection::Decrease,
            quantity: 4,
            reason: "damaged".to_owned(),
        });
        assert_eq!(action.kind(), EntityKind::Inventory);
        assert_eq!(action.keys(), vec![RowKey::from("31")]);
        assert_eq!(action.prompt(), "adjust inventory 31 by 4? (y/n)");
    }

    #[test]
    fn notices_are_kept_in_order_and_capped() {
        let mut state = AppState::default();
        for index in 0..MAX_NOTICES + 5 {
            state.dispatch(AppCommand::Notify(Notice::success(format!("n{index}"))));
        }
        assert_eq!(state.notices.len(), MAX_NOTICES);
        assert_eq!(state.notices[0].message, "n5");
        assert_eq!(state.status_line.as_deref(), Some("n54"));
    }

    #[test]
    fn page_window_toggle() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::TogglePageWindow);
        assert_eq!(state.page_window, PageWindowMode::SLIDING5);
        assert_eq!(events[0], AppEvent::PageWindowChanged(PageWindowMode::SLIDING5));
        state.dispatch(AppCommand::SetPageWindow(PageWindowMode::All));
        assert_eq!(state.page_window, PageWindowMode::All);
    }
}
