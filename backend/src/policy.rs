//! Workflow classification and the role-based field-access policy.
//!
//! Transitions between statuses are unrestricted (an admin can move a
//! completed record back to "action needed"); the engine's job is to
//! classify records into the pending/resolved buckets and to decide which
//! field groups a role may read or write.

use crate::auth::Role;
use crate::models::common::RequestStatus;
use crate::models::service_request::ServiceRequest;

/// What a role may do with a field group. Write implies read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    None,
    Read,
    Write,
}

impl FieldAccess {
    pub fn can_read(self) -> bool {
        matches!(self, FieldAccess::Read | FieldAccess::Write)
    }

    pub fn can_write(self) -> bool {
        matches!(self, FieldAccess::Write)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Personal/service/organization/calibration fields.
    Core,
    /// Workflow status and admin comments.
    StatusAndComments,
    /// `cscRemarks` / `cscInternalNotes`.
    CscOnly,
}

/// The role × field-group access table. Requester access applies to the
/// requester's own records only (ownership is checked separately); the
/// requester's core-field write happens at creation and never after.
pub fn field_access(role: Role, group: FieldGroup) -> FieldAccess {
    match (role, group) {
        (Role::Admin, _) => FieldAccess::Write,
        (Role::Requester, FieldGroup::Core) => FieldAccess::Read,
        (Role::Requester, FieldGroup::StatusAndComments) => FieldAccess::Read,
        (Role::Requester, FieldGroup::CscOnly) => FieldAccess::None,
        (Role::Technician, _) => FieldAccess::None,
    }
}

/// Pending bucket: everything that still needs service-center attention.
pub fn is_pending(status: RequestStatus) -> bool {
    !matches!(status, RequestStatus::Completed)
}

pub fn is_resolved(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Completed)
}

/// Partition records into (pending, resolved) by status. Input order is
/// preserved within each bucket.
pub fn split_buckets<T>(
    records: Vec<T>,
    status_of: impl Fn(&T) -> RequestStatus,
) -> (Vec<T>, Vec<T>) {
    records.into_iter().partition(|r| is_pending(status_of(r)))
}

/// Withhold the CSC-only fields from roles that may never see them. Applied
/// on every read path before a record leaves the service.
pub fn redact_for(role: Role, mut record: ServiceRequest) -> ServiceRequest {
    if !field_access(role, FieldGroup::CscOnly).can_read() {
        record.csc_remarks = None;
        record.csc_internal_notes = None;
    }
    record
}

/// View-time toggle for the organization/contact block on the admin view.
///
/// This is presentation state, not redaction: the stored and transmitted
/// record is always complete for admins, and masking here never feeds back
/// into storage. Distinct from [`redact_for`], which governs what a role is
/// ever sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerDetailsView {
    Shown,
    Hidden,
}

pub fn mask_customer_details(record: &ServiceRequest, view: CustomerDetailsView) -> ServiceRequest {
    let mut display = record.clone();
    if view == CustomerDetailsView::Hidden {
        display.organization_name = String::new();
        display.organization_address = String::new();
        display.contact_person = String::new();
        display.phone_no = String::new();
        display.fax_no = String::new();
        display.mobile_no = String::new();
        display.email_id = String::new();
    }
    display
}
