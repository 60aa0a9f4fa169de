#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlfrag::{Config, FragmentParser, ParseError, XmlTokenSource};

fuzz_target!(|data: &[u8]| {
    let config = Config::new("item").with_root("list").with_headers(["head"]);
    if let Ok(parser) = FragmentParser::new(&config) {
        let mut source = XmlTokenSource::from_bytes(data);
        let _ = parser.parse(&mut source, |fragment| {
            let _ = fragment.to_xml();
            Ok::<(), ParseError>(())
        });
    }
});
