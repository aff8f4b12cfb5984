//! Operation keys: the (resource, operation) pair selected per item.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::params::ParameterAccessor;
use crate::NodeError;

/// Top-level API category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Account,
    Domain,
    MailHosting,
    WebHosting,
    Kdrive,
    PublicCloud,
    SwissBackup,
    Newsletter,
    Team,
    AiTools,
    Vod,
}

/// Action selector within a resource. `CreateFolder` is shared by kDrive and VOD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    // account
    GetProfile,
    ListOrganizations,
    GetOrganization,
    ListAccounts,
    // domain
    ListDomains,
    GetDomain,
    ListDnsRecords,
    CreateDnsRecord,
    UpdateDnsRecord,
    DeleteDnsRecord,
    // mailHosting
    ListMailHostings,
    GetMailHosting,
    ListMailboxes,
    CreateMailbox,
    UpdateMailbox,
    DeleteMailbox,
    ListAliases,
    CreateAlias,
    // webHosting
    ListHostings,
    GetHosting,
    ListSites,
    GetSite,
    ListDatabases,
    CreateDatabase,
    // kdrive
    ListDrives,
    GetDrive,
    ListFiles,
    GetFileInfo,
    CreateFolder,
    DeleteFile,
    ShareFile,
    // publicCloud
    ListProjects,
    ListInstances,
    GetInstance,
    StartInstance,
    StopInstance,
    RebootInstance,
    // swissBackup
    ListBackupAccounts,
    GetBackupAccount,
    ListDevices,
    GetUsage,
    // newsletter
    ListNewsletters,
    ListCampaigns,
    CreateCampaign,
    SendCampaign,
    ListContacts,
    AddContact,
    // team
    ListWorkspaces,
    GetWorkspace,
    ListMembers,
    InviteMember,
    // aiTools
    ChatCompletion,
    GenerateImage,
    PhotoMaker,
    SpeechToText,
    // vod
    ListChannels,
    GetChannel,
    ListVideos,
    GetVideo,
    UploadVideo,
    UpdateVideo,
    DeleteVideo,
    ListFolders,
    ListPlayers,
    CreatePlayer,
    GetStatistics,
    ListEncodings,
}

impl Resource {
    /// Human-readable name, as shown in the host's resource picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Domain => "Domain",
            Self::MailHosting => "Mail Hosting",
            Self::WebHosting => "Web Hosting",
            Self::Kdrive => "kDrive",
            Self::PublicCloud => "Public Cloud",
            Self::SwissBackup => "Swiss Backup",
            Self::Newsletter => "Newsletter",
            Self::Team => "Team",
            Self::AiTools => "AI Tools",
            Self::Vod => "VOD",
        }
    }

    /// Operations offered for this resource, in presentation order.
    pub fn operations(self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Self::Account => &[GetProfile, ListOrganizations, GetOrganization, ListAccounts],
            Self::Domain => &[
                ListDomains,
                GetDomain,
                ListDnsRecords,
                CreateDnsRecord,
                UpdateDnsRecord,
                DeleteDnsRecord,
            ],
            Self::MailHosting => &[
                ListMailHostings,
                GetMailHosting,
                ListMailboxes,
                CreateMailbox,
                UpdateMailbox,
                DeleteMailbox,
                ListAliases,
                CreateAlias,
            ],
            Self::WebHosting => &[
                ListHostings,
                GetHosting,
                ListSites,
                GetSite,
                ListDatabases,
                CreateDatabase,
            ],
            Self::Kdrive => &[
                ListDrives,
                GetDrive,
                ListFiles,
                GetFileInfo,
                CreateFolder,
                DeleteFile,
                ShareFile,
            ],
            Self::PublicCloud => &[
                ListProjects,
                ListInstances,
                GetInstance,
                StartInstance,
                StopInstance,
                RebootInstance,
            ],
            Self::SwissBackup => &[ListBackupAccounts, GetBackupAccount, ListDevices, GetUsage],
            Self::Newsletter => &[
                ListNewsletters,
                ListCampaigns,
                CreateCampaign,
                SendCampaign,
                ListContacts,
                AddContact,
            ],
            Self::Team => &[ListWorkspaces, GetWorkspace, ListMembers, InviteMember],
            Self::AiTools => &[ChatCompletion, GenerateImage, PhotoMaker, SpeechToText],
            Self::Vod => &[
                ListChannels,
                GetChannel,
                ListVideos,
                GetVideo,
                UploadVideo,
                UpdateVideo,
                DeleteVideo,
                ListFolders,
                CreateFolder,
                ListPlayers,
                CreatePlayer,
                GetStatistics,
                ListEncodings,
            ],
        }
    }
}

/// Uniquely determines the shape of the request built for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationKey {
    pub resource: Resource,
    pub operation: Operation,
}

impl OperationKey {
    pub fn new(resource: Resource, operation: Operation) -> Self {
        Self { resource, operation }
    }

    /// Parse a pair of tags. Tags outside the fixed sets are parameter errors;
    /// a known but mismatched pair is accepted (it builds the no-op request).
    pub fn parse(resource: &str, operation: &str) -> Result<Self, NodeError> {
        let resource = resource
            .parse::<Resource>()
            .map_err(|_| NodeError::invalid("resource", format!("unknown resource '{resource}'")))?;
        let operation = operation.parse::<Operation>().map_err(|_| {
            NodeError::invalid("operation", format!("unknown operation '{operation}'"))
        })?;
        Ok(Self::new(resource, operation))
    }

    /// Read the `resource` and `operation` parameters of an item.
    pub fn from_params(params: &dyn ParameterAccessor) -> Result<Self, NodeError> {
        let resource = params.required_str("resource")?;
        let operation = params.required_str("operation")?;
        Self::parse(&resource, &operation)
    }

    /// `true` when the resource actually offers the operation.
    pub fn is_matched(&self) -> bool {
        self.resource.operations().contains(&self.operation)
    }

    /// Every matched pair, grouped by resource.
    pub fn all() -> impl Iterator<Item = OperationKey> {
        Resource::iter().flat_map(|resource| {
            resource
                .operations()
                .iter()
                .map(move |&operation| OperationKey::new(resource, operation))
        })
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.operation)
    }
}
