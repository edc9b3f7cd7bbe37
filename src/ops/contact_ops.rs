use crate::model::contact::{Contact, avatar_color};

/// The local contacts cache with its transient selection state.
///
/// The contact list itself is a snapshot from the store and is only ever
/// written by [`ContactDirectory::set_snapshot`]; the active flag and the
/// detail-view selection live here because they are pure UI state.
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
    selected: Option<String>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        ContactDirectory::default()
    }

    /// Replace the cached list with a fresh snapshot. The active highlight
    /// and selection survive by id; a deleted contact drops both.
    pub fn set_snapshot(&mut self, contacts: Vec<Contact>) {
        let active_id = self.active().map(|c| c.id.clone());
        self.contacts = contacts;
        if let Some(id) = active_id {
            self.set_active(&id);
        }
        if let Some(selected) = &self.selected
            && !self.contacts.iter().any(|c| &c.id == selected)
        {
            self.selected = None;
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Alphabetically sorted view, case-insensitive. Leaves the snapshot
    /// (and with it creation order) untouched.
    pub fn sorted(&self) -> Vec<&Contact> {
        let mut sorted: Vec<&Contact> = self.contacts.iter().collect();
        sorted.sort_by_key(|c| c.name.to_lowercase());
        sorted
    }

    /// Contacts offered for assignment: everyone except the signed-in
    /// user (matched by mail).
    pub fn assignable(&self, current_user_mail: Option<&str>) -> Vec<&Contact> {
        self.sorted()
            .into_iter()
            .filter(|c| current_user_mail.is_none_or(|mail| !c.mail.eq_ignore_ascii_case(mail)))
            .collect()
    }

    /// Highlight one contact. Every other active flag is cleared first, so
    /// at most one contact is ever active.
    pub fn set_active(&mut self, id: &str) {
        for contact in &mut self.contacts {
            contact.active = contact.id == id;
        }
    }

    pub fn clear_active(&mut self) {
        for contact in &mut self.contacts {
            contact.active = false;
        }
    }

    pub fn active(&self) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.active)
    }

    /// Open a contact in the detail view (also highlights it).
    pub fn select(&mut self, id: &str) {
        if self.by_id(id).is_some() {
            self.selected = Some(id.to_string());
            self.set_active(id);
        }
    }

    pub fn selected(&self) -> Option<&Contact> {
        self.selected.as_deref().and_then(|id| self.by_id(id))
    }

    /// Leave the detail view.
    pub fn back_to_list(&mut self) {
        self.selected = None;
        self.clear_active();
    }

    /// Prepare a new contact for storage: its avatar color comes from its
    /// creation-order index, which is the current directory size.
    pub fn with_avatar_color(&self, mut contact: Contact) -> Contact {
        contact.bg_color = avatar_color(self.len()).to_string();
        contact
    }
}
