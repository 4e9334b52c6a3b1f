//! Member management

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};
use crate::storage::{next_id, Member, MemberStatus, RecordCodec};

use super::errors::{LibraryError, LibraryResult};
use super::service::LibraryService;

/// Input for a new member. The id is allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Changes to a member's contact fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub member_id: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl LibraryService {
    /// Adds one member with the next free id, `Active`, zero borrows.
    pub fn add_member(&self, new: NewMember) -> LibraryResult<Member> {
        let members = self.stores.members.load_all()?;
        self.insert_member(&members, new)
    }

    /// Adds members in order; ids are allocated consecutively.
    pub fn add_members(&self, batch: Vec<NewMember>) -> LibraryResult<Vec<Member>> {
        let mut members = self.stores.members.load_all()?;
        let mut added = Vec::with_capacity(batch.len());
        for new in batch {
            let member = self.insert_member(&members, new)?;
            members.push(member.clone());
            added.push(member);
        }
        Ok(added)
    }

    fn insert_member(&self, existing: &[Member], new: NewMember) -> LibraryResult<Member> {
        let member_id = next_id(existing, |m| m.member_id).ok_or_else(|| {
            LibraryError::InvalidInput(format!("{} ids are exhausted", Member::KIND))
        })?;
        let member = self.stores.members.stored_form(Member {
            member_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            status: MemberStatus::Active,
            total_borrows: 0,
        });
        self.stores.members.append(&member)?;

        log_event_with_fields(
            Event::MemberAdded,
            &[("member_id", &member.member_id.to_string())],
        );
        Ok(member)
    }

    /// Every member in file order, blocked ones included.
    pub fn list_members(&self) -> LibraryResult<Vec<Member>> {
        Ok(self.stores.members.load_all()?)
    }

    /// Updates name, email and phone.
    pub fn update_member(&self, update: MemberUpdate) -> LibraryResult<Member> {
        let mut members = self.stores.members.load_all()?;
        let member = members
            .iter_mut()
            .find(|m| m.member_id == update.member_id)
            .ok_or_else(|| LibraryError::not_found(Member::KIND, update.member_id))?;

        if let Some(name) = update.name {
            member.name = name;
        }
        if let Some(email) = update.email {
            member.email = email;
        }
        if let Some(phone) = update.phone {
            member.phone = phone;
        }
        *member = self.stores.members.stored_form(member.clone());
        let updated = member.clone();

        self.stores.members.save_all(&members)?;

        log_event_with_fields(
            Event::MemberUpdated,
            &[("member_id", &updated.member_id.to_string())],
        );
        Ok(updated)
    }

    /// Marks a member `Blocked`. Their loans are left as they are.
    ///
    /// Blocking an already blocked member succeeds without change.
    pub fn delete_member(&self, member_id: i32) -> LibraryResult<Member> {
        let mut members = self.stores.members.load_all()?;
        let member = members
            .iter_mut()
            .find(|m| m.member_id == member_id)
            .ok_or_else(|| LibraryError::not_found(Member::KIND, member_id))?;

        member.status = MemberStatus::Blocked;
        let blocked = member.clone();

        self.stores.members.save_all(&members)?;

        log_event_with_fields(Event::MemberBlocked, &[("member_id", &member_id.to_string())]);
        Ok(blocked)
    }
}
