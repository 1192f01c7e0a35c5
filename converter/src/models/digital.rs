//! The `<digRep>` section, expressed with METS file elements.
//!
//! ```text
//! <digRep>
//!   <mets:fileSec>
//!     <mets:fileGrp USE="combined">
//!       <mets:file USE="reference">
//!         <mets:FLocat LOCTYPE="URL" xlink:href="https://..."/>
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigRep {
    pub file_sec: FileSec,
}

impl DigRep {
    /// The first file group, created with the given `USE` if there is none.
    pub fn default_file_grp(&mut self, usage: &str) -> &mut FileGrp {
        if self.file_sec.file_grps.is_empty() {
            self.file_sec.file_grps.push(FileGrp::new(usage));
        }
        &mut self.file_sec.file_grps[0]
    }
}

/// Inventory of the content files of the object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSec {
    pub file_grps: Vec<FileGrp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileGrp {
    #[serde(rename = "use")]
    pub usage: String,
    pub files: Vec<File>,
}

impl FileGrp {
    pub fn new(usage: &str) -> Self {
        Self {
            usage: usage.to_string(),
            files: Vec::new(),
        }
    }

    pub fn append_file(&mut self, file: File) {
        self.files.push(file);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(rename = "use")]
    pub usage: String,
    pub locations: Vec<FLocat>,
}

impl File {
    /// A file reachable at a single URL.
    pub fn at_url(usage: &str, href: &str) -> Self {
        Self {
            usage: usage.to_string(),
            locations: vec![FLocat::url(href)],
        }
    }
}

/// Pointer to the location of a content file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FLocat {
    pub loc_type: String,
    pub href: String,
}

impl FLocat {
    pub fn url(href: &str) -> Self {
        Self {
            loc_type: "URL".to_string(),
            href: href.to_string(),
        }
    }
}
