pub const TYPE_RULES: &[(&str, &[&str], &str)] = &[
    ("dataset", &["Q1172284"], "Dataset"),
    ("dissertation", &["Q1266946"], "Dissertation"),
    ("book-chapter", &["Q1980247"], "Book chapter"),
    ("book", &["Q47461344"], "Book"),
    ("edited-book", &["Q1711593"], "Edited book"),
    ("monograph", &["Q571", "Q193495"], "Monograph"),
    ("reference-book", &["Q47461344"], "Book"),
    ("report", &["Q10870555"], "Report"),
    ("journal-article", &["Q13442814"], "Scholarly article"),
    ("article-journal", &["Q13442814"], "Scholarly article"),
];

pub const DEFAULT_TYPE: (&[&str], &str) = (&["Q13442814"], "Scholarly article");

pub const DEGREE_CLASSES: &[(&str, &str)] = &[("PhD Thesis", "Q187685")];

pub const FIELD_PROPERTIES: &[(&str, &str)] = &[
    ("type", "P31"),
    ("BHL", "P687"),
    ("BHLPART", "P6535"),
    ("BIOSTOR", "P5315"),
    ("CINII", "P2409"),
    ("CNKI", "P6769"),
    ("DIALNET", "P1610"),
    ("DOI", "P356"),
    ("HANDLE", "P1184"),
    ("JSTOR", "P888"),
    ("PMID", "P698"),
    ("PMC", "P932"),
    ("SUDOC", "P1025"),
    ("URL", "P953"),
    ("title", "P1476"),
    ("volume", "P478"),
    ("issue", "P433"),
    ("page", "P304"),
    ("PERSEE", "P8758"),
    ("PDF", "P953"),
    ("ARCHIVE", "P724"),
    ("ZOOBANK", "P2007"),
    ("abstract", "P1922"),
    ("article-number", "P1545"),
    ("container-title", "P1433"),
    ("issued", "P577"),
    ("author", "P2093"),
    ("language", "P407"),
    ("reference", "P2860"),
    ("ISSN", "P236"),
    ("ordinal", "P1545"),
];

// BHL identifiers are credited separately, so they never carry sources on
// record rows.
pub const RECORD_PROVENANCE_EXCLUSIONS: &[&str] =
    &["P724", "P953", "P407", "P1922", "P6535", "P687"];

pub const CITATION_PROVENANCE_EXCLUSIONS: &[&str] = &["P724", "P953", "P407", "P1922"];

pub const LANGUAGES: &[(&str, &str)] = &[
    ("ca", "Q7026"),
    ("cs", "Q9056"),
    ("da", "Q9035"),
    ("de", "Q188"),
    ("en", "Q1860"),
    ("es", "Q1321"),
    ("fr", "Q150"),
    ("hu", "Q9067"),
    ("it", "Q652"),
    ("ja", "Q5287"),
    ("la", "Q397"),
    ("nl", "Q7411"),
    ("pl", "Q809"),
    ("pt", "Q5146"),
    ("ru", "Q7737"),
    ("sv", "Q9027"),
    ("th", "Q9217"),
    ("un", "Q22282914"),
    ("vi", "Q9199"),
    ("zh", "Q7850"),
];

pub const ISSN_LANGUAGES: &[(&str, &str)] = &[
    ("2178-0579", "pt"),
    ("2175-7860", "pt"),
    ("1983-0572", "pt"),
    ("1808-2688", "pt"),
    ("0101-8175", "pt"),
    ("1806-969X", "pt"),
    ("0328-0381", "pt"),
    ("0074-0276", "pt"),
    ("0065-6755", "pt"),
    ("2317-6105", "pt"),
    ("0034-7108", "pt"),
];

pub const DEFAULT_LANGUAGE: &str = "en";

pub const MAX_LABEL_LENGTH: usize = 250;

pub const MAX_ABSTRACT_LENGTH: usize = 1500;

pub const ERRATUM_CLASS: &str = "Q1348305";

pub const ADDENDUM_CLASS: &str = "Q352858";
