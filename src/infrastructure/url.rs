// Copyright 2025 The Kappital Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! URL template rendering for the manager REST surface.

/// Fill the `%v` holes of `template` with `args` in order. Surplus holes
/// stay empty, surplus arguments are ignored. No escaping is performed;
/// inputs are validated upstream.
pub fn render_url(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(pos) = rest.find("%v") {
        out.push_str(&rest[..pos]);
        if let Some(arg) = args.next() {
            out.push_str(arg);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::render_url;
    use crate::infrastructure::constants::*;

    #[test]
    fn test_render_list_url() {
        let url = render_url(GET_SERVICES_URL, &["https://10.0.0.1:443", "prod-1"]);
        assert_eq!(
            url,
            "https://10.0.0.1:443/api/v1alpha1/servicebinding?cluster_name=prod-1"
        );
    }

    #[test]
    fn test_render_single_service_url_keeps_query_order() {
        let url = render_url(GET_SERVICE_URL, &["https://m:443", "/foo", "prod-1"]);
        assert_eq!(
            url,
            "https://m:443/api/v1alpha1/servicebinding/foo?cluster_name=prod-1"
        );
        let url = format!("{}{}", url, DETAIL_QUERY);
        assert!(url.ends_with("?cluster_name=prod-1&detail=true"));
    }

    #[test]
    fn test_render_empty_name_yields_list_endpoint() {
        let url = render_url(GET_SERVICE_URL, &["https://m:443", "", "default"]);
        assert_eq!(
            url,
            "https://m:443/api/v1alpha1/servicebinding?cluster_name=default"
        );
    }

    #[test]
    fn test_render_delete_instance_url() {
        let url = render_url(
            DELETE_INSTANCE_URL,
            &["https://m:443", "svc-1", "inst-1", "prod-1"],
        );
        assert_eq!(
            url,
            "https://m:443/api/v1alpha1/servicebinding/svc-1/instance/inst-1?cluster_name=prod-1"
        );
    }

    #[test]
    fn test_missing_args_leave_holes_empty() {
        assert_eq!(render_url("%v/a/%v", &["base"]), "base/a/");
    }
}
