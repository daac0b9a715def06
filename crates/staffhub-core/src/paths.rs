//! Tenant-scoped document paths.
//!
//! All business data is stored under `tenants/{tenantId}/{resourceType}/{resourceId}`.
//! The helpers here are pure string templates: given the same input they always
//! produce the same path, and the only ways they fail are a malformed tenant ID
//! or a document ID that is not a single path segment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StaffHubError};
use crate::tenant::TenantId;

/// Root collection holding one document per tenant.
pub const TENANTS_ROOT: &str = "tenants";

/// Fixed table of tenant-scoped collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Departments,
    Employees,
    Jobs,
    Candidates,
    Applications,
    Interviews,
    Timesheets,
    Attendance,
    LeaveRequests,
    Payroll,
    Payslips,
    Benefits,
    PerformanceReviews,
    Trainings,
    Onboarding,
    Documents,
    Notifications,
    Settings,
    Users,
}

impl ResourceType {
    pub const ALL: [ResourceType; 19] = [
        Self::Departments,
        Self::Employees,
        Self::Jobs,
        Self::Candidates,
        Self::Applications,
        Self::Interviews,
        Self::Timesheets,
        Self::Attendance,
        Self::LeaveRequests,
        Self::Payroll,
        Self::Payslips,
        Self::Benefits,
        Self::PerformanceReviews,
        Self::Trainings,
        Self::Onboarding,
        Self::Documents,
        Self::Notifications,
        Self::Settings,
        Self::Users,
    ];

    /// Collection name as stored in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Employees => "employees",
            Self::Jobs => "jobs",
            Self::Candidates => "candidates",
            Self::Applications => "applications",
            Self::Interviews => "interviews",
            Self::Timesheets => "timesheets",
            Self::Attendance => "attendance",
            Self::LeaveRequests => "leaveRequests",
            Self::Payroll => "payroll",
            Self::Payslips => "payslips",
            Self::Benefits => "benefits",
            Self::PerformanceReviews => "performanceReviews",
            Self::Trainings => "trainings",
            Self::Onboarding => "onboarding",
            Self::Documents => "documents",
            Self::Notifications => "notifications",
            Self::Settings => "settings",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = StaffHubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| StaffHubError::UnknownResource(s.to_string()))
    }
}

/// Check that a document ID names exactly one document inside its collection.
///
/// Rejects empty IDs, IDs containing `/`, and the relative segments `.` / `..`.
/// Any other character is allowed; stores encode it where their transport needs to.
pub fn validate_document_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains('/') || id == "." || id == ".." {
        return Err(StaffHubError::InvalidDocumentId(id.to_string()));
    }
    Ok(())
}

/// Infallible path builder for an already validated tenant.
///
/// Document IDs are taken as given; run untrusted ones through
/// [`validate_document_id`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPaths {
    tenant: TenantId,
}

impl TenantPaths {
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// `tenants/{tenantId}`
    pub fn root(&self) -> String {
        format!("{TENANTS_ROOT}/{}", self.tenant)
    }

    /// `tenants/{tenantId}/{resourceType}`
    pub fn collection(&self, resource: ResourceType) -> String {
        format!("{TENANTS_ROOT}/{}/{}", self.tenant, resource)
    }

    /// Collection path for an arbitrary collection name (used by migration,
    /// whose source collections are configurable).
    pub fn named_collection(&self, name: &str) -> String {
        format!("{TENANTS_ROOT}/{}/{}", self.tenant, name)
    }

    /// `tenants/{tenantId}/{resourceType}/{resourceId}`
    pub fn document(&self, resource: ResourceType, id: &str) -> String {
        format!("{}/{}", self.collection(resource), id)
    }

    /// Object storage key for a file attached to a tenant resource.
    pub fn storage_file(&self, resource: ResourceType, id: &str, file_name: &str) -> String {
        format!("{}/files/{}", self.document(resource, id), file_name)
    }

    pub fn employee(&self, id: &str) -> String {
        self.document(ResourceType::Employees, id)
    }

    pub fn department(&self, id: &str) -> String {
        self.document(ResourceType::Departments, id)
    }

    pub fn job(&self, id: &str) -> String {
        self.document(ResourceType::Jobs, id)
    }

    pub fn candidate(&self, id: &str) -> String {
        self.document(ResourceType::Candidates, id)
    }

    pub fn timesheet(&self, id: &str) -> String {
        self.document(ResourceType::Timesheets, id)
    }

    pub fn leave_request(&self, id: &str) -> String {
        self.document(ResourceType::LeaveRequests, id)
    }

    pub fn payroll(&self, id: &str) -> String {
        self.document(ResourceType::Payroll, id)
    }
}

// ── String-keyed helpers ────────────────────────────────────
// These take the raw tenant ID and reject malformed ones.

fn paths_for(tenant_id: &str) -> Result<TenantPaths> {
    TenantId::parse(tenant_id).map(TenantPaths::new)
}

pub fn tenant_root(tenant_id: &str) -> Result<String> {
    Ok(paths_for(tenant_id)?.root())
}

pub fn collection(tenant_id: &str, resource: ResourceType) -> Result<String> {
    Ok(paths_for(tenant_id)?.collection(resource))
}

pub fn document(tenant_id: &str, resource: ResourceType, id: &str) -> Result<String> {
    let paths = paths_for(tenant_id)?;
    validate_document_id(id)?;
    Ok(paths.document(resource, id))
}

pub fn storage_file(tenant_id: &str, resource: ResourceType, id: &str, file_name: &str) -> Result<String> {
    let paths = paths_for(tenant_id)?;
    validate_document_id(id)?;
    Ok(paths.storage_file(resource, id, file_name))
}

pub fn employees(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Employees, id)
}

pub fn departments(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Departments, id)
}

pub fn jobs(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Jobs, id)
}

pub fn candidates(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Candidates, id)
}

pub fn timesheets(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Timesheets, id)
}

pub fn leave_requests(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::LeaveRequests, id)
}

pub fn payroll(tenant_id: &str, id: &str) -> Result<String> {
    document(tenant_id, ResourceType::Payroll, id)
}

/// Split a tenant document path back into its parts.
///
/// Returns `None` for anything that is not exactly
/// `tenants/{tenantId}/{resourceType}/{resourceId}` with a valid tenant and a
/// known resource type.
pub fn parse_document_path(path: &str) -> Option<(TenantId, ResourceType, String)> {
    let mut parts = path.split('/');
    let (root, tenant, resource, id) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    if root != TENANTS_ROOT || validate_document_id(id).is_err() || parts.next().is_some() {
        return None;
    }
    let tenant = TenantId::parse(tenant).ok()?;
    let resource = resource.parse().ok()?;
    Some((tenant, resource, id.to_string()))
}

/// Last segment of a document path, i.e. the document ID.
pub fn document_id(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
