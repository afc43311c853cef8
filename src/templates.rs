//! HTML rendering for the dashboard.
//!
//! Rendering goes through askama, which HTML-escapes every interpolated
//! value. Header values and environment strings are attacker-influenced, so
//! nothing in the template may be marked `|safe`.

use askama::Template;

use crate::discovery::{NodeContext, ServiceMap};
use crate::http::request::MultiMap;

/// Everything the dashboard displays for one request.
#[derive(Debug, Clone, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub node: NodeContext,
    pub client_address: String,
    pub headers: MultiMap,
    pub version: String,
    pub services: ServiceMap,
}

impl DashboardTemplate {
    pub fn render_html(&self) -> Result<String, askama::Error> {
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> DashboardTemplate {
        DashboardTemplate {
            node: NodeContext {
                hostname: "pod-a".into(),
                namespace: "default".into(),
                node_name: "worker-1".into(),
                node_ip: "192.168.1.10".into(),
            },
            client_address: "10.0.0.9".into(),
            headers: MultiMap::new(),
            version: "1.2.3".into(),
            services: ServiceMap::new(),
        }
    }

    #[test]
    fn renders_identity_table() {
        let html = page().render_html().unwrap();
        assert!(html.contains("<td>pod-a</td>"));
        assert!(html.contains("<td>10.0.0.9</td>"));
        assert!(html.contains("<td>worker-1</td>"));
        assert!(html.contains("<td>192.168.1.10</td>"));
        assert!(html.contains("version 1.2.3"));
    }

    #[test]
    fn services_block_absent_without_services() {
        let html = page().render_html().unwrap();
        assert!(!html.contains("id=\"services\""));
        assert!(!html.contains("Kubernetes Services Found"));
    }

    #[test]
    fn services_heading_carries_exact_count() {
        let mut page = page();
        page.services.insert("REDIS".into(), "tcp://10.0.0.7:6379".into());
        page.services.insert("API".into(), "tcp://10.0.0.8:80".into());

        let html = page.render_html().unwrap();
        assert!(html.contains("Kubernetes Services Found: 2"));
        assert!(html.contains("<td>REDIS</td><td>tcp://10.0.0.7:6379</td>"));
    }

    #[test]
    fn header_values_cannot_inject_markup() {
        let mut page = page();
        page.headers.insert(
            "X-Evil".into(),
            vec![r#"<script>alert("x")</script>"#.into(), "a'b&c".into()],
        );
        page.client_address = "<img src=x onerror=alert(1)>".into();

        let html = page.render_html().unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(!html.contains("<img src=x"));
        assert!(html.contains(
            "<td>X-Evil</td><td>&#60;script&#62;alert(&#34;x&#34;)&#60;/script&#62;, a&#39;b&#38;c</td>"
        ));
    }

    #[test]
    fn quotes_cannot_break_out_of_attributes() {
        let mut page = page();
        page.headers.insert(
            "X-Quote".into(),
            vec![r#"" onmouseover="alert(1)"#.into()],
        );

        let html = page.render_html().unwrap();
        assert!(!html.contains(r#"" onmouseover=""#));
        assert!(html.contains("&#34; onmouseover=&#34;alert(1)"));
    }

    #[test]
    fn environment_values_are_escaped() {
        let mut page = page();
        page.services.insert("EVIL".into(), "tcp://\"><b>bold</b>".into());
        page.node.namespace = "</td><td>".into();

        let html = page.render_html().unwrap();
        assert!(!html.contains("<b>bold</b>"));
        assert!(!html.contains("<td></td><td></td>"));
    }

    #[test]
    fn multi_valued_headers_are_joined() {
        let mut page = page();
        page.headers.insert("Accept".into(), vec!["a".into(), "b".into()]);

        let html = page.render_html().unwrap();
        assert!(html.contains("<td>Accept</td><td>a, b</td>"));
    }
}
