//! Request builder: (operation key, parameters) → request descriptor.
//!
//! Pure and re-entrant. The only failures are parameter errors raised while
//! reading required values.

use serde_json::{Map, Value};
use tracing::debug;

use super::operation::OperationKey;
use super::request::RequestDescriptor;
use super::table;
use crate::params::{include_if, Inclusion, ParameterAccessor};
use crate::NodeError;

/// Paging and filtering options accepted by every list operation.
const LIST_OPTIONS: [(&str, Inclusion); 6] = [
    ("limit", Inclusion::Truthy),
    ("page", Inclusion::Truthy),
    ("order_by", Inclusion::Truthy),
    ("order", Inclusion::Truthy),
    ("search", Inclusion::Truthy),
    ("with_count", Inclusion::Defined),
];

/// Build the request descriptor for one item.
///
/// Unmatched keys produce [`RequestDescriptor::noop`].
pub fn build_request(
    key: OperationKey,
    params: &dyn ParameterAccessor,
) -> Result<RequestDescriptor, NodeError> {
    let Some(rule) = table::lookup(key) else {
        debug!(%key, "no build rule for operation key, using no-op request");
        return Ok(RequestDescriptor::noop());
    };

    let path = rule.path.render(params)?;
    let body = match rule.body {
        Some(build) => build(params)?,
        None => Map::new(),
    };
    let mut query = match rule.query {
        Some(build) => build(params)?,
        None => Map::new(),
    };
    if rule.list {
        merge_list_options(&mut query, &params.collection("additionalOptions")?);
    }

    debug!(%key, method = %rule.method, %path, "built request descriptor");

    Ok(RequestDescriptor {
        method: rule.method,
        path,
        query,
        body,
    })
}

/// Merge generic list options into `query`. Keys already set by the operation win.
pub fn merge_list_options(query: &mut Map<String, Value>, options: &Map<String, Value>) {
    for (key, inclusion) in LIST_OPTIONS {
        if !query.contains_key(key) {
            include_if(query, options, key, inclusion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infomaniak::operation::{Operation, Resource};
    use crate::infomaniak::request::Method;
    use crate::params::ParameterBag;
    use serde_json::json;

    /// Every parameter an operation may require, and nothing optional.
    fn required_only() -> ParameterBag {
        let mut bag = ParameterBag::new();
        for name in [
            "organizationId",
            "domainId",
            "recordId",
            "recordName",
            "recordValue",
            "mailHostingId",
            "mailboxId",
            "emailAddress",
            "password",
            "aliasEmail",
            "destinationEmail",
            "hostingId",
            "siteId",
            "databaseName",
            "driveId",
            "fileId",
            "folderName",
            "projectId",
            "instanceId",
            "backupAccountId",
            "newsletterId",
            "campaignId",
            "campaignName",
            "subject",
            "contactEmail",
            "workspaceId",
            "memberEmail",
            "aiProductId",
            "imagePrompt",
            "inputImages",
            "audioFile",
            "vodChannelId",
            "vodVideoId",
            "videoName",
            "videoFile",
            "vodFolderName",
            "playerName",
        ] {
            bag.insert(name, format!("{name}-value"));
        }
        bag.insert("messages", json!({ "message": [] }));
        bag
    }

    const OPTIONAL_BODY_KEYS: [&str; 20] = [
        "first_name",
        "last_name",
        "html_content",
        "max_tokens",
        "temperature",
        "profile_type",
        "stream",
        "n",
        "size",
        "quality",
        "style",
        "negative_prompt",
        "language",
        "folder",
        "auto_publish",
        "auto_validate",
        "description",
        "published",
        "validated",
        "tags",
    ];

    #[test]
    fn every_pair_builds_a_path_without_optional_fields() {
        let params = required_only();
        for key in OperationKey::all() {
            let request = build_request(key, &params).expect("required parameters are present");
            assert!(request.path.starts_with('/'), "{key}");
            assert!(!request.path.contains('{'), "{key}: {}", request.path);
            assert!(request.query.is_empty(), "{key}: {:?}", request.query);
            for optional in OPTIONAL_BODY_KEYS {
                assert!(!request.body.contains_key(optional), "{key} leaked {optional}");
            }
            if !request.method.carries_body() {
                assert!(request.body.is_empty(), "{key}");
            }
        }
    }

    #[test]
    fn same_parameters_build_the_same_request() {
        let params = required_only();
        for key in OperationKey::all() {
            assert_eq!(
                build_request(key, &params).unwrap(),
                build_request(key, &params).unwrap(),
                "{key}"
            );
        }
    }

    #[test]
    fn unmatched_pair_builds_noop() {
        let key = OperationKey::new(Resource::Account, Operation::ListDomains);
        let request = build_request(key, &ParameterBag::new()).unwrap();
        assert_eq!(request, RequestDescriptor::noop());
    }

    #[test]
    fn update_mailbox_is_a_bare_patch() {
        let key = OperationKey::new(Resource::MailHosting, Operation::UpdateMailbox);
        let params = ParameterBag::new()
            .with("mailHostingId", "m1")
            .with("mailboxId", "box");
        let request = build_request(key, &params).unwrap();
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.path, "/1/mail_hostings/m1/mailboxes/box");
        assert!(request.body.is_empty());
    }

    #[test]
    fn create_dns_record_request() {
        let key = OperationKey::new(Resource::Domain, Operation::CreateDnsRecord);
        let params = ParameterBag::new()
            .with("domainId", 55)
            .with("recordType", "TXT")
            .with("recordName", "@")
            .with("recordValue", "v=spf1 -all")
            .with("ttl", 300);
        let request = build_request(key, &params).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/1/domain/55/dns/record");
        assert_eq!(
            Value::Object(request.body),
            json!({ "type": "TXT", "source": "@", "target": "v=spf1 -all", "ttl": 300 })
        );
    }

    #[test]
    fn list_operations_merge_paging_options() {
        let key = OperationKey::new(Resource::Domain, Operation::ListDomains);
        let params = ParameterBag::new().with(
            "additionalOptions",
            json!({ "limit": 10, "order": "desc", "search": "", "with_count": false }),
        );
        let request = build_request(key, &params).unwrap();
        assert_eq!(
            Value::Object(request.query),
            json!({ "limit": 10, "order": "desc", "with_count": false })
        );
    }

    #[test]
    fn non_list_operations_ignore_paging_options() {
        let key = OperationKey::new(Resource::Domain, Operation::GetDomain);
        let params = ParameterBag::new()
            .with("domainId", "d")
            .with("additionalOptions", json!({ "limit": 10 }));
        assert!(build_request(key, &params).unwrap().query.is_empty());
    }

    #[test]
    fn vod_lists_ignore_paging_options() {
        let paging = json!({ "limit": 10, "page": 2, "with_count": true });
        for operation in [
            Operation::ListChannels,
            Operation::ListFolders,
            Operation::ListPlayers,
            Operation::ListEncodings,
        ] {
            let key = OperationKey::new(Resource::Vod, operation);
            let params = ParameterBag::new()
                .with("vodChannelId", "c")
                .with("additionalOptions", paging.clone());
            assert!(build_request(key, &params).unwrap().query.is_empty(), "{key}");
        }

        let key = OperationKey::new(Resource::Vod, Operation::ListVideos);
        let params = ParameterBag::new()
            .with("vodChannelId", "c")
            .with("vodOptions", json!({ "include_subtitles": true, "include_chapters": false }))
            .with("additionalOptions", paging);
        let request = build_request(key, &params).unwrap();
        assert_eq!(Value::Object(request.query), json!({ "include_subtitles": true }));
    }

    #[test]
    fn operation_specific_query_keys_are_not_overwritten() {
        let mut query = Map::new();
        query.insert("limit".into(), json!(5));
        let options = json!({ "limit": 10, "order": "desc" });
        merge_list_options(&mut query, options.as_object().unwrap());
        assert_eq!(Value::Object(query), json!({ "limit": 5, "order": "desc" }));
    }

    #[test]
    fn statistics_carry_date_filters() {
        let key = OperationKey::new(Resource::Vod, Operation::GetStatistics);
        let params = ParameterBag::new()
            .with("vodChannelId", "c")
            .with("vodOptions", json!({ "date_from": "2024-01-01", "date_to": "" }));
        let request = build_request(key, &params).unwrap();
        assert_eq!(request.path, "/1/vod/channel/c/statistics/consumption");
        assert_eq!(Value::Object(request.query), json!({ "date_from": "2024-01-01" }));
    }

    #[test]
    fn image_operations_always_request_base64() {
        let params = required_only().with("aiOptions", json!({ "response_format": "url" }));
        for operation in [Operation::GenerateImage, Operation::PhotoMaker] {
            let key = OperationKey::new(Resource::AiTools, operation);
            let request = build_request(key, &params).unwrap();
            assert_eq!(request.body["response_format"], json!("b64_json"), "{key}");
        }
    }

    #[test]
    fn missing_required_body_field_fails_the_item() {
        let key = OperationKey::new(Resource::Team, Operation::InviteMember);
        let params = ParameterBag::new().with("workspaceId", "w");
        assert_eq!(
            build_request(key, &params),
            Err(NodeError::MissingParameter("memberEmail".into()))
        );
    }
}
