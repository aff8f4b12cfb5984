//! The operation table: one build rule per matched operation key.
//!
//! Rules are declared once, indexed by [`OperationKey`] and looked up once per
//! item. Unmatched keys have no rule and build the no-op descriptor.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde_json::{Map, Value};

use super::bodies;
use super::operation::{Operation, OperationKey, Resource};
use super::request::Method;
use crate::params::ParameterAccessor;
use crate::NodeError;

/// Builds a body or query mapping from the item's parameters.
pub type FieldsFn = fn(&dyn ParameterAccessor) -> Result<Map<String, Value>, NodeError>;

/// Builds a path that cannot be expressed as a single template.
pub type PathFn = fn(&dyn ParameterAccessor) -> Result<String, NodeError>;

/// How the request path is produced.
#[derive(Clone, Copy)]
pub enum PathRule {
    /// `{name}` placeholders interpolated left to right from parameters.
    /// Placeholders listed in `defaults` fall back to the given value.
    Template {
        template: &'static str,
        defaults: &'static [(&'static str, &'static str)],
    },
    /// Path selected at build time; `shape` documents the alternatives.
    Computed {
        shape: &'static str,
        build: PathFn,
    },
}

impl PathRule {
    pub fn render(&self, params: &dyn ParameterAccessor) -> Result<String, NodeError> {
        match self {
            Self::Template { template, defaults } => interpolate(template, defaults, params),
            Self::Computed { build, .. } => build(params),
        }
    }

    /// The template (or documented shape) for listings.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Template { template, .. } => *template,
            Self::Computed { shape, .. } => *shape,
        }
    }
}

fn interpolate(
    template: &str,
    defaults: &[(&str, &str)],
    params: &dyn ParameterAccessor,
) -> Result<String, NodeError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            path.push_str(&rest[open..]);
            return Ok(path);
        };

        let name = &after[..close];
        let value = match defaults.iter().find(|(param, _)| *param == name) {
            Some((_, default)) => params.optional_str(name, default)?,
            None => params.required_str(name)?,
        };
        path.push_str(&value);
        rest = &after[close + 1..];
    }

    path.push_str(rest);
    Ok(path)
}

/// Names of the `{name}` placeholders in a template, in order.
#[cfg(test)]
fn placeholders(template: &str) -> Vec<&str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|segment| segment.split_once('}').map(|(name, _)| name))
        .collect()
}

/// Everything needed to build the request for one operation key.
#[derive(Clone, Copy)]
pub struct BuildRule {
    pub method: Method,
    pub path: PathRule,
    pub body: Option<FieldsFn>,
    pub query: Option<FieldsFn>,
    /// Member of the list-operation set: generic paging options are merged in.
    pub list: bool,
}

impl fmt::Debug for BuildRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRule")
            .field("method", &self.method)
            .field("path", &self.path.shape())
            .field("body", &self.body.is_some())
            .field("query", &self.query.is_some())
            .field("list", &self.list)
            .finish()
    }
}

impl BuildRule {
    fn new(method: Method, template: &'static str) -> Self {
        Self {
            method,
            path: PathRule::Template {
                template,
                defaults: &[],
            },
            body: None,
            query: None,
            list: false,
        }
    }

    fn get(template: &'static str) -> Self {
        Self::new(Method::Get, template)
    }

    fn post(template: &'static str) -> Self {
        Self::new(Method::Post, template)
    }

    fn put(template: &'static str) -> Self {
        Self::new(Method::Put, template)
    }

    fn patch(template: &'static str) -> Self {
        Self::new(Method::Patch, template)
    }

    fn delete(template: &'static str) -> Self {
        Self::new(Method::Delete, template)
    }

    fn list(template: &'static str) -> Self {
        Self {
            list: true,
            ..Self::get(template)
        }
    }

    fn computed(method: Method, shape: &'static str, build: PathFn) -> Self {
        Self {
            path: PathRule::Computed { shape, build },
            ..Self::new(method, shape)
        }
    }

    fn defaults(mut self, values: &'static [(&'static str, &'static str)]) -> Self {
        if let PathRule::Template { defaults, .. } = &mut self.path {
            *defaults = values;
        }
        self
    }

    fn body(self, build: FieldsFn) -> Self {
        Self {
            body: Some(build),
            ..self
        }
    }

    fn query(self, build: FieldsFn) -> Self {
        Self {
            query: Some(build),
            ..self
        }
    }
}

const DIRECTORY_DEFAULT: &[(&str, &str)] = &[("directoryId", "1")];

static TABLE: LazyLock<HashMap<OperationKey, BuildRule>> = LazyLock::new(|| {
    use Operation as O;
    use Resource as R;

    let rules = [
        // account
        (R::Account, O::GetProfile, BuildRule::get("/1/profile")),
        (R::Account, O::ListOrganizations, BuildRule::list("/1/organizations")),
        (R::Account, O::GetOrganization, BuildRule::get("/1/organization/{organizationId}")),
        (R::Account, O::ListAccounts, BuildRule::list("/1/accounts")),
        // domain
        (R::Domain, O::ListDomains, BuildRule::list("/1/domains")),
        (R::Domain, O::GetDomain, BuildRule::get("/1/domain/{domainId}")),
        (R::Domain, O::ListDnsRecords, BuildRule::list("/1/domain/{domainId}/dns/record")),
        (
            R::Domain,
            O::CreateDnsRecord,
            BuildRule::post("/1/domain/{domainId}/dns/record").body(bodies::dns_record),
        ),
        (
            R::Domain,
            O::UpdateDnsRecord,
            BuildRule::put("/1/domain/{domainId}/dns/record/{recordId}").body(bodies::dns_record),
        ),
        (
            R::Domain,
            O::DeleteDnsRecord,
            BuildRule::delete("/1/domain/{domainId}/dns/record/{recordId}"),
        ),
        // mailHosting
        (R::MailHosting, O::ListMailHostings, BuildRule::list("/1/mail_hostings")),
        (
            R::MailHosting,
            O::GetMailHosting,
            BuildRule::get("/1/mail_hostings/{mailHostingId}"),
        ),
        (
            R::MailHosting,
            O::ListMailboxes,
            BuildRule::list("/1/mail_hostings/{mailHostingId}/mailboxes"),
        ),
        (
            R::MailHosting,
            O::CreateMailbox,
            BuildRule::post("/1/mail_hostings/{mailHostingId}/mailboxes").body(bodies::mailbox),
        ),
        // Sends no fields; kept as a bare PATCH.
        (
            R::MailHosting,
            O::UpdateMailbox,
            BuildRule::patch("/1/mail_hostings/{mailHostingId}/mailboxes/{mailboxId}"),
        ),
        (
            R::MailHosting,
            O::DeleteMailbox,
            BuildRule::delete("/1/mail_hostings/{mailHostingId}/mailboxes/{mailboxId}"),
        ),
        (
            R::MailHosting,
            O::ListAliases,
            BuildRule::list("/1/mail_hostings/{mailHostingId}/aliases"),
        ),
        (
            R::MailHosting,
            O::CreateAlias,
            BuildRule::post("/1/mail_hostings/{mailHostingId}/aliases").body(bodies::alias),
        ),
        // webHosting
        (R::WebHosting, O::ListHostings, BuildRule::list("/1/hostings")),
        (R::WebHosting, O::GetHosting, BuildRule::get("/1/hosting/{hostingId}")),
        (R::WebHosting, O::ListSites, BuildRule::list("/1/hosting/{hostingId}/sites")),
        (
            R::WebHosting,
            O::GetSite,
            BuildRule::get("/1/hosting/{hostingId}/site/{siteId}"),
        ),
        (
            R::WebHosting,
            O::ListDatabases,
            BuildRule::list("/1/hosting/{hostingId}/databases"),
        ),
        (
            R::WebHosting,
            O::CreateDatabase,
            BuildRule::post("/1/hosting/{hostingId}/databases").body(bodies::database),
        ),
        // kdrive
        (R::Kdrive, O::ListDrives, BuildRule::list("/2/drive")),
        (R::Kdrive, O::GetDrive, BuildRule::get("/2/drive/{driveId}")),
        (
            R::Kdrive,
            O::ListFiles,
            BuildRule::list("/2/drive/{driveId}/files/{directoryId}/children")
                .defaults(DIRECTORY_DEFAULT),
        ),
        (
            R::Kdrive,
            O::GetFileInfo,
            BuildRule::get("/2/drive/{driveId}/files/{fileId}"),
        ),
        (
            R::Kdrive,
            O::CreateFolder,
            BuildRule::post("/2/drive/{driveId}/files/{directoryId}/directory")
                .defaults(DIRECTORY_DEFAULT)
                .body(bodies::drive_folder),
        ),
        (
            R::Kdrive,
            O::DeleteFile,
            BuildRule::delete("/2/drive/{driveId}/files/{fileId}"),
        ),
        (
            R::Kdrive,
            O::ShareFile,
            BuildRule::post("/2/drive/{driveId}/files/{fileId}/share"),
        ),
        // publicCloud
        (R::PublicCloud, O::ListProjects, BuildRule::list("/1/public-cloud/projects")),
        (
            R::PublicCloud,
            O::ListInstances,
            BuildRule::list("/1/public-cloud/{projectId}/instances"),
        ),
        (
            R::PublicCloud,
            O::GetInstance,
            BuildRule::get("/1/public-cloud/{projectId}/instances/{instanceId}"),
        ),
        (
            R::PublicCloud,
            O::StartInstance,
            BuildRule::post("/1/public-cloud/{projectId}/instances/{instanceId}/start"),
        ),
        (
            R::PublicCloud,
            O::StopInstance,
            BuildRule::post("/1/public-cloud/{projectId}/instances/{instanceId}/stop"),
        ),
        (
            R::PublicCloud,
            O::RebootInstance,
            BuildRule::post("/1/public-cloud/{projectId}/instances/{instanceId}/reboot"),
        ),
        // swissBackup
        (
            R::SwissBackup,
            O::ListBackupAccounts,
            BuildRule::list("/1/swiss-backup/accounts"),
        ),
        (
            R::SwissBackup,
            O::GetBackupAccount,
            BuildRule::get("/1/swiss-backup/{backupAccountId}"),
        ),
        (
            R::SwissBackup,
            O::ListDevices,
            BuildRule::list("/1/swiss-backup/{backupAccountId}/devices"),
        ),
        (
            R::SwissBackup,
            O::GetUsage,
            BuildRule::get("/1/swiss-backup/{backupAccountId}/usage"),
        ),
        // newsletter
        (R::Newsletter, O::ListNewsletters, BuildRule::list("/1/newsletters")),
        (
            R::Newsletter,
            O::ListCampaigns,
            BuildRule::list("/1/newsletter/{newsletterId}/campaigns"),
        ),
        (
            R::Newsletter,
            O::CreateCampaign,
            BuildRule::post("/1/newsletter/{newsletterId}/campaigns").body(bodies::campaign),
        ),
        (
            R::Newsletter,
            O::SendCampaign,
            BuildRule::post("/1/newsletter/campaign/{campaignId}/send"),
        ),
        (
            R::Newsletter,
            O::ListContacts,
            BuildRule::list("/1/newsletter/{newsletterId}/contacts"),
        ),
        (
            R::Newsletter,
            O::AddContact,
            BuildRule::post("/1/newsletter/{newsletterId}/contacts").body(bodies::contact),
        ),
        // team
        (R::Team, O::ListWorkspaces, BuildRule::list("/1/workspaces")),
        (R::Team, O::GetWorkspace, BuildRule::get("/1/workspace/{workspaceId}")),
        (R::Team, O::ListMembers, BuildRule::list("/1/workspace/{workspaceId}/members")),
        (
            R::Team,
            O::InviteMember,
            BuildRule::post("/1/workspace/{workspaceId}/invite").body(bodies::invitation),
        ),
        // aiTools
        (
            R::AiTools,
            O::ChatCompletion,
            BuildRule::post("/1/ai/{aiProductId}/openai/chat/completions")
                .body(bodies::chat_completion),
        ),
        (
            R::AiTools,
            O::GenerateImage,
            BuildRule::post("/1/ai/{aiProductId}/openai/images/generations")
                .body(bodies::image_generation),
        ),
        (
            R::AiTools,
            O::PhotoMaker,
            BuildRule::post("/1/ai/{aiProductId}/images/generations/photo_maker")
                .body(bodies::photo_maker),
        ),
        (
            R::AiTools,
            O::SpeechToText,
            BuildRule::post("/1/ai/{aiProductId}/openai/audio/transcriptions")
                .body(bodies::transcription),
        ),
        // vod
        (R::Vod, O::ListChannels, BuildRule::get("/1/vod/channel")),
        (R::Vod, O::GetChannel, BuildRule::get("/1/vod/channel/{vodChannelId}")),
        (
            R::Vod,
            O::ListVideos,
            BuildRule::get("/1/vod/channel/{vodChannelId}/media").query(bodies::video_query),
        ),
        (
            R::Vod,
            O::GetVideo,
            BuildRule::get("/1/vod/channel/{vodChannelId}/media/{vodVideoId}")
                .query(bodies::video_query),
        ),
        (
            R::Vod,
            O::UploadVideo,
            BuildRule::post("/1/vod/channel/{vodChannelId}/upload").body(bodies::video_upload),
        ),
        (
            R::Vod,
            O::UpdateVideo,
            BuildRule::put("/1/vod/channel/{vodChannelId}/media/{vodVideoId}")
                .body(bodies::video_update),
        ),
        (
            R::Vod,
            O::DeleteVideo,
            BuildRule::delete("/1/vod/channel/{vodChannelId}/media/{vodVideoId}"),
        ),
        (R::Vod, O::ListFolders, BuildRule::get("/1/vod/channel/{vodChannelId}/folder")),
        (
            R::Vod,
            O::CreateFolder,
            BuildRule::post("/1/vod/channel/{vodChannelId}/folder").body(bodies::vod_folder),
        ),
        (R::Vod, O::ListPlayers, BuildRule::get("/1/vod/channel/{vodChannelId}/player")),
        (
            R::Vod,
            O::CreatePlayer,
            BuildRule::post("/1/vod/channel/{vodChannelId}/player").body(bodies::player),
        ),
        (
            R::Vod,
            O::GetStatistics,
            BuildRule::computed(
                Method::Get,
                "/1/vod/channel/{vodChannelId}/statistics/{consumption | media/{statisticsMediaId}}",
                bodies::statistics_path,
            )
            .query(bodies::statistics_query),
        ),
        (
            R::Vod,
            O::ListEncodings,
            BuildRule::get("/1/vod/channel/{vodChannelId}/encoding"),
        ),
    ];

    rules
        .into_iter()
        .map(|(resource, operation, rule)| (OperationKey::new(resource, operation), rule))
        .collect()
});

/// The build rule for a key, or `None` for unmatched pairs.
pub fn lookup(key: OperationKey) -> Option<&'static BuildRule> {
    TABLE.get(&key)
}
