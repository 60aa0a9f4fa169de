#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

#[cfg(test)]
mod fragment_tests {
    use xmlfrag::{
        Attr, Config, Element, Fragment, FragmentParser, Name, SourceOptions, StartTag,
        XmlTokenSource,
    };

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn start_tag(local: &str, attrs: &[(&str, &str)]) -> StartTag {
        StartTag {
            name: Name::local(local),
            attrs: attrs
                .iter()
                .map(|(k, v)| Attr::new(Name::local(*k), *v))
                .collect(),
        }
    }

    fn element(local: &str, inner_xml: &str, chardata: &str, attrs: &[(&str, &str)]) -> Element {
        let start = start_tag(local, attrs);
        Element {
            name: start.name,
            attrs: start.attrs,
            inner_xml: inner_xml.to_string(),
            chardata: chardata.to_string(),
            comment: String::new(),
        }
    }

    fn fragments(xml: &str, config: &Config) -> xmlfrag::Result<Vec<Fragment>> {
        let parser = FragmentParser::new(config)?;
        let mut source = XmlTokenSource::from_bytes(xml.as_bytes());
        parser.parse_all(&mut source)
    }

    fn trimmed_fragments(xml: &str, config: &Config) -> xmlfrag::Result<Vec<Fragment>> {
        let parser = FragmentParser::new(config)?;
        let options = SourceOptions {
            trim_text: true,
            ..SourceOptions::default()
        };
        let mut source = XmlTokenSource::with_options(xml.as_bytes(), options);
        parser.parse_all(&mut source)
    }

    fn header_names(fragment: &Fragment) -> Vec<&str> {
        fragment
            .headers
            .iter()
            .map(|h| h.name.local.as_str())
            .collect()
    }

    #[test]
    fn test_body_is_its_own_root() -> TestResult {
        let xml = r#"<head attr="value"><foo>bar</foo></head>"#;
        let out = fragments(xml, &Config::new("head"))?;

        assert_eq!(
            out,
            vec![Fragment {
                root: start_tag("head", &[("attr", "value")]),
                headers: Vec::new().into(),
                body: element("head", "<foo>bar</foo>", "", &[("attr", "value")]),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_repeated_items_in_list() -> TestResult {
        let xml = "<list><item><foo>foo1</foo><bar><baz>baz1</baz></bar></item>\
                   <item><foo>foo2</foo></item></list>";
        let out = fragments(xml, &Config::new("item"))?;

        assert_eq!(
            out,
            vec![
                Fragment {
                    root: start_tag("item", &[]),
                    headers: Vec::new().into(),
                    body: element("item", "<foo>foo1</foo><bar><baz>baz1</baz></bar>", "", &[]),
                },
                Fragment {
                    root: start_tag("item", &[]),
                    headers: Vec::new().into(),
                    body: element("item", "<foo>foo2</foo>", "", &[]),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_headers_scoped_by_root() -> TestResult {
        let xml = r#"<xmlRoot>
            <rootTag>
                <head2>
                    <name attr="head2attr">head2name</name>
                    <value>head2value</value>
                </head2>
                <body>foo1</body>
            </rootTag>
            <rootTag>
                <head1>
                    <name>head1name</name>
                    <value>head1value</value>
                </head1>
                <head2>
                    <name attr="head2attr">head2name</name>
                    <value>head2value</value>
                </head2>
                <body>foo2</body>
                <body>foo3</body>
            </rootTag>
        </xmlRoot>"#;
        let config = Config::new("body")
            .with_root("rootTag")
            .with_headers(["head1", "head2"]);
        let out = trimmed_fragments(xml, &config)?;

        let head1 = element(
            "head1",
            "<name>head1name</name><value>head1value</value>",
            "",
            &[],
        );
        let head2 = element(
            "head2",
            r#"<name attr="head2attr">head2name</name><value>head2value</value>"#,
            "",
            &[],
        );
        let expected = vec![
            Fragment {
                root: start_tag("rootTag", &[]),
                headers: vec![head2.clone()].into(),
                body: element("body", "foo1", "foo1", &[]),
            },
            Fragment {
                root: start_tag("rootTag", &[]),
                headers: vec![head1.clone(), head2.clone()].into(),
                body: element("body", "foo2", "foo2", &[]),
            },
            Fragment {
                root: start_tag("rootTag", &[]),
                headers: vec![head1, head2].into(),
                body: element("body", "foo3", "foo3", &[]),
            },
        ];

        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn test_body_before_first_root_is_ignored() -> TestResult {
        let xml = "<doc><body>early</body><root><body>late</body></root></doc>";
        let out = fragments(xml, &Config::new("body").with_root("root"))?;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].body.chardata, "late");
        Ok(())
    }

    #[test]
    fn test_header_before_first_root_is_ignored() -> TestResult {
        let xml = "<doc><h>stale</h><root><body>x</body></root></doc>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 1);
        assert!(out[0].headers.is_empty());
        Ok(())
    }

    #[test]
    fn test_new_root_discards_unused_headers() -> TestResult {
        let xml = "<doc><root><h>1</h></root><root><h>2</h><body>x</body></root></doc>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].headers.len(), 1);
        assert_eq!(out[0].headers[0].chardata, "2");
        Ok(())
    }

    #[test]
    fn test_repeated_header_name_keeps_every_occurrence() -> TestResult {
        let xml = "<root><h>1</h><g>a</g><h>2</h><body>x</body></root>";
        let config = Config::new("body")
            .with_root("root")
            .with_headers(["h", "g"]);
        let out = fragments(xml, &config)?;

        assert_eq!(header_names(&out[0]), vec!["h", "g", "h"]);
        let values: Vec<&str> = out[0].headers.iter().map(|h| h.chardata.as_str()).collect();
        assert_eq!(values, vec!["1", "a", "2"]);
        Ok(())
    }

    #[test]
    fn test_emitted_headers_are_snapshots() -> TestResult {
        let xml = "<root><h>1</h><body>a</body><h>2</h><body>b</body></root>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].headers.len(), 1);
        assert_eq!(out[1].headers.len(), 2);
        assert_eq!(out[0].headers[0], out[1].headers[0]);
        Ok(())
    }

    #[test]
    fn test_bodies_under_one_root_share_context() -> TestResult {
        let xml = r#"<root id="r1"><h>ctx</h><body>a</body><body>b</body><body>c</body></root>"#;
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 3);
        for fragment in &out[1..] {
            assert_eq!(fragment.root, out[0].root);
            assert_eq!(fragment.headers, out[0].headers);
        }
        assert_eq!(out[0].root.attr("id"), Some("r1"));
        Ok(())
    }

    #[test]
    fn test_matching_ignores_namespace_prefixes() -> TestResult {
        let xml = r#"<a:list xmlns:a="urn:a" xmlns:b="urn:b"><a:item>1</a:item><b:item>2</b:item></a:list>"#;
        let out = fragments(xml, &Config::new("item"))?;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].body.name, Name::prefixed("a", "item"));
        assert_eq!(out[1].body.name, Name::prefixed("b", "item"));
        Ok(())
    }

    #[test]
    fn test_empty_body_element() -> TestResult {
        let xml = r#"<list><item id="1"/><item id="2"></item></list>"#;
        let out = fragments(xml, &Config::new("item"))?;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].body, element("item", "", "", &[("id", "1")]));
        assert_eq!(out[1].body, element("item", "", "", &[("id", "2")]));
        Ok(())
    }

    #[test]
    fn test_matches_found_inside_ignored_elements() -> TestResult {
        let xml = "<doc><wrapper><root><section><h>1</h><deep><body>x</body></deep></section></root></wrapper></doc>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 1);
        assert_eq!(header_names(&out[0]), vec!["h"]);
        Ok(())
    }

    #[test]
    fn test_body_inside_header_is_not_a_fragment() -> TestResult {
        let xml = "<root><h><body>hidden</body></h><body>seen</body></root>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].body.chardata, "seen");
        assert_eq!(out[0].headers[0].inner_xml, "<body>hidden</body>");
        Ok(())
    }

    #[test]
    fn test_comments_and_escaped_text_are_captured() -> TestResult {
        let xml = "<list><item><!-- first -->a &amp; b<x/></item></list>";
        let out = fragments(xml, &Config::new("item"))?;

        let body = &out[0].body;
        assert_eq!(body.comment, " first ");
        assert_eq!(body.chardata, "a & b");
        assert_eq!(body.inner_xml, "<!-- first -->a &amp; b<x/>");
        Ok(())
    }

    #[test]
    fn test_dangling_template_is_discarded() -> TestResult {
        let xml = "<doc><root><h>1</h><body>x</body></root><root><h>2</h></root></doc>";
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(out.len(), 1);
        Ok(())
    }

    #[test]
    fn test_fragment_to_xml_rebuilds_context() -> TestResult {
        let xml = r#"<root v="1"><h><k>a</k></h><body><n>x</n></body></root>"#;
        let config = Config::new("body").with_root("root").with_headers(["h"]);
        let out = fragments(xml, &config)?;

        assert_eq!(
            out[0].to_xml()?,
            r#"<root v="1"><h><k>a</k></h><body><n>x</n></body></root>"#
        );
        Ok(())
    }

    #[test]
    fn test_parser_is_reusable() -> TestResult {
        let parser = FragmentParser::new(&Config::new("item"))?;
        for xml in ["<l><item>1</item></l>", "<l><item>2</item><item>3</item></l>"] {
            let mut source = XmlTokenSource::from_bytes(xml.as_bytes());
            let count = parser.parse_all(&mut source)?.len();
            assert_eq!(count, xml.matches("<item>").count());
        }
        Ok(())
    }
}
