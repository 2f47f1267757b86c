//! Field-diff engine.
//!
//! Compares a declared configuration against an observed record field by
//! field and produces the record an update call should carry: the observed
//! record with every differing declared field overwritten. Fields without
//! declared intent are left untouched, so a configuration that omits an
//! optional field can never clobber a server-chosen value.
//!
//! The same merge serves both directions: at creation the base is the
//! server's just-created record full of defaults; on later passes the base
//! is the last-known state.

use l7sync_sdk::{l7origin, l7resource};

use crate::model::{OriginSpec, ResourceSpec};

/// Overwrite `$field` with a declared value when one exists and differs.
macro_rules! merge {
    ($changed:ident, $field:expr, $declared:expr) => {
        if let Some(value) = &$declared {
            if $field != *value {
                $field = value.clone();
                $changed = true;
            }
        }
    };
}

/// Overlay every declared field of `spec` onto `base`.
///
/// Returns the merged record and whether anything changed at all — the
/// caller skips the update call entirely when nothing did.
pub fn merge_resource(base: &l7resource::Item, spec: &ResourceSpec) -> (l7resource::Item, bool) {
    let mut merged = base.clone();
    let mut changed = false;

    if merged.l7_resource_name != spec.name {
        merged.l7_resource_name = spec.name.clone();
        changed = true;
    }

    merge!(changed, merged.l7_resource_is_active, spec.is_active);
    merge!(changed, merged.l7_protection_disable, spec.protection_disable);
    merge!(changed, merged.use_custom_ssl, spec.use_custom_ssl);
    merge!(changed, merged.use_letsencrypt_ssl, spec.use_letsencrypt_ssl);
    merge!(changed, merged.custom_ssl_key, spec.custom_ssl_key);
    merge!(changed, merged.custom_ssl_crt, spec.custom_ssl_crt);
    merge!(changed, merged.forcessl, spec.force_ssl);
    merge!(changed, merged.service_http2, spec.service_http2);
    merge!(changed, merged.geoip_mode, spec.geoip_mode);
    merge!(changed, merged.geoip_list, spec.geoip_list);
    merge!(
        changed,
        merged.global_whitelist_active,
        spec.global_whitelist_active
    );
    merge!(changed, merged.http2https, spec.http2https);
    merge!(changed, merged.https2http, spec.https2http);
    merge!(changed, merged.wwwredir, spec.www_redir);
    merge!(changed, merged.cdn, spec.cdn);
    merge!(changed, merged.cdn_host, spec.cdn_host);
    merge!(changed, merged.cdn_proxy_host, spec.cdn_proxy_host);

    (merged, changed)
}

/// Overlay a declared origin onto its matched remote record.
///
/// The IP is compared too: matching is normally by IP so it will be equal,
/// but a caller merging against a freshly created record gets the same
/// correction semantics as for any other field.
pub fn merge_origin(base: &l7origin::Item, spec: &OriginSpec) -> (l7origin::Item, bool) {
    let mut merged = base.clone();
    let mut changed = false;

    if merged.ip != spec.ip {
        merged.ip = spec.ip.clone();
        changed = true;
    }
    merge!(changed, merged.weight, spec.weight);
    merge!(changed, merged.mode, spec.mode);

    (merged, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_resource() -> l7resource::Item {
        l7resource::Item {
            l7_resource_id: 1234,
            l7_resource_name: "edge1".into(),
            l7_resource_is_active: 1,
            global_whitelist_active: 1,
            geoip_list: "RU".into(),
            protected_ip: "203.0.113.10".into(),
            ..Default::default()
        }
    }

    #[test]
    fn identical_spec_reports_no_change() {
        let base = base_resource();
        let spec = ResourceSpec {
            name: "edge1".into(),
            is_active: Some(1),
            geoip_list: Some("RU".into()),
            ..Default::default()
        };

        let (merged, changed) = merge_resource(&base, &spec);
        assert!(!changed);
        assert_eq!(merged, base);
    }

    #[test]
    fn declared_difference_overwrites_and_flags() {
        let base = base_resource();
        let spec = ResourceSpec {
            name: "edge1".into(),
            is_active: Some(0),
            ..Default::default()
        };

        let (merged, changed) = merge_resource(&base, &spec);
        assert!(changed);
        assert_eq!(merged.l7_resource_is_active, 0);
        // Untouched fields keep the base values.
        assert_eq!(merged.geoip_list, "RU");
        assert_eq!(merged.global_whitelist_active, 1);
    }

    #[test]
    fn unset_fields_never_clobber() {
        let base = base_resource();
        let spec = ResourceSpec {
            name: "edge1".into(),
            ..Default::default()
        };

        let (merged, changed) = merge_resource(&base, &spec);
        assert!(!changed);
        assert_eq!(merged.geoip_list, "RU");
        assert_eq!(merged.l7_resource_is_active, 1);
    }

    #[test]
    fn name_always_carries_intent() {
        let base = base_resource();
        let spec = ResourceSpec {
            name: "edge2".into(),
            ..Default::default()
        };

        let (merged, changed) = merge_resource(&base, &spec);
        assert!(changed);
        assert_eq!(merged.l7_resource_name, "edge2");
    }

    #[test]
    fn origin_weight_diff_is_detected() {
        let base = l7origin::Item {
            l7_resource_id: 1234,
            id: 1,
            ip: "10.0.0.1".into(),
            weight: 50,
            ..Default::default()
        };
        let spec = OriginSpec {
            ip: "10.0.0.1".into(),
            weight: Some(10),
            mode: None,
        };

        let (merged, changed) = merge_origin(&base, &spec);
        assert!(changed);
        assert_eq!(merged.weight, 10);
        assert_eq!(merged.id, 1);
    }

    #[test]
    fn matching_origin_is_a_noop() {
        let base = l7origin::Item {
            ip: "10.0.0.1".into(),
            weight: 50,
            mode: "primary".into(),
            ..Default::default()
        };
        let spec = OriginSpec {
            ip: "10.0.0.1".into(),
            weight: Some(50),
            mode: None,
        };

        let (_, changed) = merge_origin(&base, &spec);
        assert!(!changed);
    }
}
