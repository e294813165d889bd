// Sample files in every supported encoding with their expected detection

use encdetect::Encoding;

/// A sample text file and how it is expected to be detected
pub struct Sample {
    pub name: &'static str,
    pub encoding: Encoding,
    pub text: &'static str,
    pub with_bom: bool,
}

impl Sample {
    pub fn bytes(&self) -> Vec<u8> {
        super::encode(self.encoding, self.text, self.with_bom)
    }
}

pub const ONE_LINE: &str = "The quick brown fox jumps over the lazy dog";

pub const MULTI_LINE: &str = "First line of the sample\r\nSecond line\r\nThird and last line\r\n";

pub const UNICODE_TEXT: &str = "Caf\u{e9} cr\u{e8}me, \u{4e16}\u{754c}, \u{1F980}\n";

pub const SAMPLES: &[Sample] = &[
    Sample { name: "utf-8-bom.txt", encoding: Encoding::Utf8, text: UNICODE_TEXT, with_bom: true },
    Sample { name: "utf-16be-bom.txt", encoding: Encoding::Utf16Be, text: UNICODE_TEXT, with_bom: true },
    Sample { name: "utf-16le-bom.txt", encoding: Encoding::Utf16Le, text: UNICODE_TEXT, with_bom: true },
    Sample { name: "ascii.txt", encoding: Encoding::Ascii, text: MULTI_LINE, with_bom: false },
    Sample { name: "utf-8.txt", encoding: Encoding::Utf8, text: UNICODE_TEXT, with_bom: false },
    Sample { name: "utf-16be-oneline.txt", encoding: Encoding::Utf16Be, text: ONE_LINE, with_bom: false },
    Sample { name: "utf-16be-multiline.txt", encoding: Encoding::Utf16Be, text: MULTI_LINE, with_bom: false },
    Sample { name: "utf-16le-oneline.txt", encoding: Encoding::Utf16Le, text: ONE_LINE, with_bom: false },
    Sample { name: "utf-16le-multiline.txt", encoding: Encoding::Utf16Le, text: MULTI_LINE, with_bom: false },
];

/// Look up a sample by file name
pub fn sample(name: &str) -> &'static Sample {
    SAMPLES
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no sample named {name}"))
}
