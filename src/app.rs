//! Application root: upload, history and viewer screens wired together.

use std::path::Path;

use web_time::Instant;

use crate::{
    error::MolcapError,
    history::FileRepository,
    ingest,
    model::{FileId, FileRecord},
    navigation::{NavigationState, Tab},
    notice::{Notice, Notices},
    panel::{PanelAction, PanelView, ViewerPanel},
};

/// Owns the history, the navigation state and the viewer panel, and keeps
/// the panel bound to the active file while the viewer screen is showing.
pub struct App<R: FileRepository> {
    history: R,
    navigation: NavigationState,
    panel: ViewerPanel,
    notices: Notices,
}

impl<R: FileRepository> App<R> {
    /// App over `history`, showing the upload screen.
    #[must_use]
    pub fn new(history: R, panel: ViewerPanel) -> Self {
        Self {
            history,
            navigation: NavigationState::new(),
            panel,
            notices: Notices::default(),
        }
    }

    /// Upload history.
    #[must_use]
    pub fn history(&self) -> &R {
        &self.history
    }

    /// Navigation state.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Viewer panel.
    #[must_use]
    pub fn panel(&self) -> &ViewerPanel {
        &self.panel
    }

    /// Viewer panel snapshot.
    #[must_use]
    pub fn panel_view(&self) -> PanelView {
        self.panel.view()
    }

    /// The active file's record.
    #[must_use]
    pub fn active_record(&self) -> Option<&FileRecord> {
        self.navigation
            .active_file()
            .and_then(|id| self.history.get(id))
    }

    /// Upload the file at `path`: store it, select it and open the viewer.
    pub fn upload_file(&mut self, path: &Path) -> Option<FileId> {
        let result = ingest::ingest_file(path);
        self.accept_upload(result)
    }

    /// Upload an in-memory file.
    pub fn upload_bytes(&mut self, name: &str, bytes: &[u8]) -> Option<FileId> {
        let result = ingest::ingest_bytes(name, bytes);
        self.accept_upload(result)
    }

    /// Open a history entry in the viewer. Unknown ids are ignored.
    pub fn select(&mut self, id: &FileId) -> bool {
        if self.history.get(id).is_none() {
            log::debug!("ignoring selection of unknown file {id}");
            return false;
        }
        self.navigation.open(id.clone());
        self.sync();
        true
    }

    /// Rename a history entry.
    pub fn rename(&mut self, id: &FileId, name: &str) -> bool {
        match self.history.rename(id, name) {
            Ok(changed) => {
                self.sync();
                changed
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Delete a history entry, deselecting it if it was active.
    pub fn delete(&mut self, id: &FileId) -> bool {
        match self.history.remove(id) {
            Ok(removed) => {
                let _ = self.navigation.forget(id);
                self.sync();
                removed.is_some()
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Delete every history entry.
    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear() {
            self.report(&e);
            return;
        }
        self.navigation.clear_active();
        self.sync();
    }

    /// Switch screens. Leaving the viewer releases its surface.
    pub fn show_tab(&mut self, tab: Tab) {
        self.navigation.show(tab);
        self.sync();
    }

    /// Forward a viewer action.
    pub fn dispatch(&mut self, action: PanelAction, now: Instant) {
        self.panel.dispatch(action, now);
    }

    /// Event-loop turn.
    pub fn update(&mut self, dt: f32, now: Instant) {
        self.panel.update(dt, now);
    }

    /// Remove every pending notice, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let mut notices = self.notices.drain();
        notices.extend(self.panel.take_notices());
        notices
    }

    fn accept_upload(
        &mut self,
        result: Result<FileRecord, MolcapError>,
    ) -> Option<FileId> {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                self.report(&e);
                return None;
            }
        };
        let id = record.id.clone();
        if let Err(e) = self.history.add(record) {
            self.report(&e);
            return None;
        }
        self.navigation.open(id.clone());
        self.sync();
        Some(id)
    }

    fn report(&mut self, error: &MolcapError) {
        log::error!("{error}");
        let notice = match error {
            MolcapError::FileFormatRejected(name) => {
                Notice::FileFormatRejected(name.clone())
            }
            other => Notice::Io(other.to_string()),
        };
        self.notices.push(notice);
    }

    fn sync(&mut self) {
        if self.navigation.tab() == Tab::Viewer {
            let record = self
                .navigation
                .active_file()
                .and_then(|id| self.history.get(id));
            self.panel.bind(record);
        } else {
            self.panel.unbind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        capture::ArtifactRegistry,
        history::MemoryHistory,
        options::Options,
        recording::RecordingPhase,
        testing::{pdb_fixture, MockCapture, MockRender, PDB_CUBE_EDGE},
    };

    fn app() -> (App<MemoryHistory>, MockRender) {
        let render = MockRender::new();
        let panel = ViewerPanel::new(
            Box::new(render.clone()),
            Box::new(MockCapture::with_chunks(vec![b"clip".to_vec()])),
            ArtifactRegistry::shared(),
            &Options::default(),
        );
        (App::new(MemoryHistory::new(), panel), render)
    }

    fn upload(app: &mut App<MemoryHistory>, name: &str) -> FileId {
        app.upload_bytes(name, pdb_fixture(PDB_CUBE_EDGE).as_bytes())
            .unwrap()
    }

    #[test]
    fn upload_opens_viewer() {
        let (mut app, render) = app();
        let id = upload(&mut app, "1ubq.pdb");
        assert_eq!(app.navigation().tab(), Tab::Viewer);
        assert_eq!(app.navigation().active_file(), Some(&id));
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.panel_view().title.as_deref(), Some("1ubq.pdb"));
        assert_eq!(render.live_surfaces(), 1);
    }

    #[test]
    fn rejected_upload_is_a_notice() {
        let (mut app, render) = app();
        assert!(app.upload_bytes("notes.txt", b"hello").is_none());
        assert_eq!(
            app.take_notices(),
            vec![Notice::FileFormatRejected("notes.txt".into())]
        );
        assert!(app.history().is_empty());
        assert_eq!(app.navigation().tab(), Tab::Upload);
        assert_eq!(render.created(), 0);
    }

    #[test]
    fn leaving_viewer_releases_surface() {
        let (mut app, render) = app();
        let id = upload(&mut app, "a.pdb");
        app.show_tab(Tab::History);
        assert_eq!(render.live_surfaces(), 0);

        assert!(app.select(&id));
        assert_eq!(app.navigation().tab(), Tab::Viewer);
        assert_eq!(render.live_surfaces(), 1);
        assert!(!app.select(&FileId::from("missing")));
    }

    #[test]
    fn selecting_another_file_swaps_surface() {
        let (mut app, render) = app();
        let a = upload(&mut app, "a.pdb");
        let _b = upload(&mut app, "b.pdb");
        assert_eq!(render.created(), 2);
        assert!(app.select(&a));
        assert_eq!(render.created(), 3);
        assert_eq!(render.live_surfaces(), 1);
    }

    #[test]
    fn rename_updates_title_without_reload() {
        let (mut app, render) = app();
        let id = upload(&mut app, "a.pdb");
        assert!(app.rename(&id, "ubiquitin.pdb"));
        assert!(!app.rename(&id, "   "));
        assert_eq!(app.panel_view().title.as_deref(), Some("ubiquitin.pdb"));
        assert_eq!(render.created(), 1);
    }

    #[test]
    fn deleting_active_file_clears_viewer() {
        let (mut app, render) = app();
        let id = upload(&mut app, "a.pdb");
        app.dispatch(PanelAction::Record, Instant::now());
        assert_eq!(app.panel_view().phase, RecordingPhase::Recording);

        assert!(app.delete(&id));
        assert!(app.navigation().active_file().is_none());
        assert!(app.active_record().is_none());
        assert_eq!(render.live_surfaces(), 0);
        assert_eq!(app.panel_view().phase, RecordingPhase::Idle);
        assert!(!app.delete(&id));
    }

    #[test]
    fn clear_history_deselects() {
        let (mut app, render) = app();
        let _ = upload(&mut app, "a.pdb");
        let _ = upload(&mut app, "b.pdb");
        app.clear_history();
        assert!(app.history().is_empty());
        assert!(app.navigation().active_file().is_none());
        assert_eq!(render.live_surfaces(), 0);
    }
}
