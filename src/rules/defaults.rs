use super::RuleSet;

const DEFAULT_PROVIDERS: &[(&str, &[&str])] = &[
    (
        "Google",
        &[
            "utm_source",
            "utm_medium",
            "utm_campaign",
            "utm_term",
            "utm_content",
            "utm_id",
            "gclid",
            "gclsrc",
            "dclid",
            "wbraid",
            "gbraid",
            "gad_source",
        ],
    ),
    (
        "Meta",
        &[
            "fbclid",
            "fb_action_ids",
            "fb_action_types",
            "fb_source",
            "fb_ref",
            "fb_ad_id",
            "fb_adset_id",
            "fb_campaign_id",
            "igsh",
        ],
    ),
    (
        "TikTok",
        &[
            "ttclid",
            "tt_content_id",
            "tt_medium",
            "tt_campaign_id",
            "tt_ad_id",
            "tt_adset_id",
        ],
    ),
    (
        "Microsoft",
        &["msclkid", "li_fat_id", "li_source", "li_medium", "li_campaign"],
    ),
    (
        "Twitter",
        &["twclid", "ref_src", "s", "t", "tw_campaign", "tw_source"],
    ),
    (
        "Reddit",
        &["rdt_cid", "rdt_source", "rdt_medium", "rdt_campaign"],
    ),
    (
        "Snapchat",
        &["sc_cid", "sc_source", "sc_medium", "sc_campaign"],
    ),
    ("Pinterest", &["epik", "pin_campaign", "pin_source"]),
    (
        "Amazon",
        &[
            "tag",
            "ascsubtag",
            "asc_source",
            "creative",
            "creativeASIN",
            "linkCode",
            "th",
        ],
    ),
    ("Mailchimp", &["mc_cid", "mc_eid"]),
    (
        "HubSpot",
        &[
            "hsa_acc", "hsa_cam", "hsa_grp", "hsa_ad", "hsa_src", "hsa_net", "hsa_ver",
        ],
    ),
    ("Adobe", &["s_cid", "ef_id"]),
    (
        "Salesforce",
        &["pi_campaign_id", "pi_source", "pi_ad_id"],
    ),
    (
        "Shopify",
        &["shopify", "shopify_app", "shopify_email", "shopify_utm"],
    ),
    (
        "Email",
        &[
            "mkt_tok",
            "_hsenc",
            "_hsmi",
            "trk",
            "trkCampaign",
            "campaign",
            "source",
        ],
    ),
    (
        "Affiliate",
        &[
            "aff_id",
            "affiliate_id",
            "ref",
            "ref_id",
            "referrer",
            "partner",
            "partner_id",
            "click_id",
            "clickid",
            "cid",
            "subid",
            "sub_id",
        ],
    ),
    (
        "Analytics",
        &[
            "_ga",
            "_gl",
            "_gac",
            "_gid",
            "yclid",
            "rb_clickid",
            "vero_id",
            "vero_conv",
            "oly_anon_id",
            "oly_enc_id",
            "appSharePlatform",
        ],
    ),
];

/// Rule set written to `trackers.json` on first run.
pub fn default_rule_set() -> RuleSet {
    DEFAULT_PROVIDERS
        .iter()
        .map(|(provider, params)| {
            (
                (*provider).to_string(),
                params.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn defaults_have_single_owner_per_parameter() {
        let rules = default_rule_set();
        let mut seen = HashSet::new();
        for provider in rules.providers() {
            for param in &provider.parameters {
                assert!(
                    seen.insert(param.to_lowercase()),
                    "{param} listed twice in defaults"
                );
            }
        }
    }

    #[test]
    fn defaults_keep_document_order() {
        let rules = default_rule_set();
        let names: Vec<_> = rules.providers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Google"));
        assert_eq!(names.last(), Some(&"Analytics"));
        assert_eq!(names.len(), 17);
    }
}
