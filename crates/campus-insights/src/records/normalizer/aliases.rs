use super::RecordCategory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One canonical field of a record category and every raw spelling observed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

const fn field(
    key: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        aliases,
    }
}

pub(crate) const STUDENT_FIELDS: &[FieldSpec] = &[
    field("idNum", "ID Number", &["IDNUM", "ID_NUM", "idNum", "id_num"]),
    field(
        "studentEmployCode",
        "Employment Code",
        &["Stud_employ_cde", "STUD_EMPLOY_CDE", "studentEmployCode", "stud_employ_cde"],
    ),
    field("webGroup", "Web Group", &["web_grp", "WEB_GRP", "webGroup"]),
    field("tuitionCode", "Tuition Code", &["tuition_cde", "TUITION_CDE", "tuitionCode"]),
    field("entranceYear", "Entrance Year", &["ENTRANCE_YR", "entrance_yr", "entranceYear"]),
    field(
        "entranceTerm",
        "Entrance Term",
        &["ENTRANCE_TRM", "entrance_trm", "entrance_term", "entranceTerm"],
    ),
    field(
        "currentClassCode",
        "Current Class",
        &["CURRENT_CLASS_CDE", "current_class_cde", "currentClassCode"],
    ),
    field("numOfCourses", "Number of Courses", &["NUM_OF_CRS", "num_of_crs", "numOfCourses"]),
    field("hoursEnrolled", "Hours Enrolled", &["HRS_ENROLLED", "hrs_enrolled", "hoursEnrolled"]),
    field(
        "termHoursEarned",
        "Term Hours Earned",
        &["TRM_HRS_EARNED", "trm_hrs_earned", "termHoursEarned"],
    ),
    field("careerGpa", "Career GPA", &["CAREER_GPA", "career_gpa", "careerGpa", "gpa"]),
    field("degreeCode", "Degree Code", &["DEGR_CDE", "degr_cde", "degreeCode"]),
    field("major1", "Major", &["MAJOR_1", "major_1", "major1"]),
    field("minor1", "Minor", &["MINOR_1", "minor_1", "minor1"]),
    field(
        "concentration1",
        "Concentration",
        &["CONCENTRATION_1", "concentration_1", "concentration1"],
    ),
    // Analytics extract columns
    field("yearCode", "Academic Year", &["yr_cde", "YR_CDE", "yearCode", "year"]),
    field("gender", "Gender", &["gender", "GENDER"]),
    field("international", "Residency", &["international", "INTERNATIONAL"]),
    field("age", "Age", &["age", "AGE"]),
    field("programCode", "Program Code", &["prog_cde", "PROG_CDE", "programCode"]),
    field("seniority", "Class Level", &["seniority", "SENIORITY"]),
    field("divisionCode", "Division Code", &["div_cde", "DIV_CDE", "divisionCode"]),
    field("country", "Country", &["country", "COUNTRY"]),
];

pub(crate) const INFO_FIELDS: &[FieldSpec] = &[
    field("id_num", "ID Number", &["ID_NUM", "id_num", "idNum", "IDNUM"]),
    field("last_name", "Last Name", &["LAST_NAME", "last_name", "lastName"]),
    field("first_name", "First Name", &["FIRST_NAME", "first_name", "firstName"]),
    field("middle_name", "Middle Name", &["MIDDLE_NAME", "middle_name", "middleName"]),
    field("mobile_phone", "Mobile Phone", &["MOBILE_PHONE", "mobile_phone", "mobilePhone"]),
    field(
        "email_address",
        "Email Address",
        &["EMAIL_ADDRESS", "email_address", "emailAddress"],
    ),
    field("appid", "Application ID", &["APPID", "appid", "appId"]),
    field("name_format", "Name Format", &["NAME_FORMAT", "name_format", "nameFormat"]),
    field("birth_name", "Birth Name", &["BIRTH_NAME", "birth_name", "birthName"]),
    field(
        "stud_mstr_employ",
        "Employment Status",
        &["STUD_MSTR_EMPLOY", "stud_mstr_employ", "studMstrEmploy"],
    ),
];

pub(crate) const CANDIDACY_FIELDS: &[FieldSpec] = &[
    field("idNum", "ID Number", &["idNum", "IDNUM", "ID_NUM", "id_num"]),
    field("yearCode", "Year Code", &["yearCode", "YR_CDE", "yr_cde"]),
    field("divisionCode", "Division Code", &["divisionCode", "DIV_CDE", "div_cde"]),
    field("stage", "Stage", &["stage", "STAGE"]),
    field("programCode", "Program Code", &["programCode", "PROG_CDE", "prog_cde"]),
    field("termCode", "Term Code", &["termCode", "TRM_CDE", "trm_cde"]),
    field("hsOrgTypeAd", "HS Org Type", &["hsOrgTypeAd", "HS_ORG_TYPE_AD", "hs_org_type_ad"]),
    field("schoolType", "School Type", &["schoolType", "SCHOOL_TYPE", "school_type"]),
    field("clOrgTypeAd", "CL Org Type", &["clOrgTypeAd", "CL_ORG_TYPE_AD", "cl_org_type_ad"]),
    field("clGpa", "CL GPA", &["clGpa", "CL_GPA", "cl_gpa"]),
    field(
        "clTotalApCredits",
        "CL Total AP Credits",
        &["clTotalApCredits", "CL_TOTAL_AP_CREDITS", "cl_total_ap_credits"],
    ),
    field(
        "clTotalInstCredits",
        "CL Total Inst Credits",
        &["clTotalInstCredits", "CL_TOTAL_INST_CREDITS", "cl_total_inst_credits"],
    ),
    field("act", "ACT", &["act", "ACT"]),
    field("gat", "GAT", &["gat", "GAT"]),
    field("gre", "GRE", &["gre", "GRE"]),
    field("sat", "SAT", &["sat", "SAT"]),
    field("satRc", "SAT Reading", &["satRc", "SAT_RC", "sat_rc"]),
    field("satWc", "SAT Writing", &["satWc", "SAT_WC", "sat_wc"]),
    field("tef", "TEF", &["tef", "TEF"]),
    field("toepp", "TOEPP", &["toepp", "TOEPP"]),
    field("birthDate", "Birth Date", &["birthDate", "BIRTH_DTE", "birth_dte", "BIRTH_DATE"]),
    field("citizenOf", "Citizenship", &["citizenOf", "CITIZEN_OF", "citizen_of"]),
    field("city", "City", &["city", "CITY"]),
    field("country", "Country", &["country", "COUNTRY"]),
    field("addressLine1", "Address", &["addressLine1", "ADDR_LINE_1", "address_line_1"]),
    field("birthName", "Birth Name", &["birthName", "BIRTH_NAME", "birth_name"]),
    field("firstName", "First Name", &["firstName", "FIRST_NAME", "first_name"]),
    field("lastName", "Last Name", &["lastName", "LAST_NAME", "last_name"]),
    field(
        "emailAddress",
        "Email Address",
        &["emailAddress", "EMAIL_ADDRESS", "email_address"],
    ),
    field("gender", "Gender", &["gender", "GENDER"]),
    field("mobile", "Mobile", &["mobile", "MOBILE", "mobile_phone"]),
    field("fatherAddress", "Father Address", &["fatherAddress", "FATHER_ADDRESS", "father_address"]),
    field("motherAddress", "Mother Address", &["motherAddress", "MOTHER_ADDRESS", "mother_address"]),
    field("fatherPhone", "Father Phone", &["fatherPhone", "FATHER_PHONE", "father_phone"]),
    field("motherPhone", "Mother Phone", &["motherPhone", "MOTHER_PHONE", "mother_phone"]),
    field(
        "fatherOccupation",
        "Father Occupation",
        &["fatherOccupation", "FATHER_OCCUPATION", "father_occupation"],
    ),
    field(
        "motherOccupation",
        "Mother Occupation",
        &["motherOccupation", "MOTHER_OCCUPATION", "mother_occupation"],
    ),
    field("appFeeDate", "Application Fee Date", &["appFeeDate", "APP_FEE_DTE", "app_fee_dte"]),
    field("udef1a1", "Custom Field", &["udef1a1", "UDEF_1A_1", "udef_1a_1"]),
];

pub(crate) fn fields_for(category: RecordCategory) -> &'static [FieldSpec] {
    match category {
        RecordCategory::Student => STUDENT_FIELDS,
        RecordCategory::PersonalInfo => INFO_FIELDS,
        RecordCategory::Candidacy => CANDIDACY_FIELDS,
    }
}

static ALIAS_MAPS: OnceLock<[HashMap<String, &'static str>; 3]> = OnceLock::new();

/// Canonical key for a raw field name, if the category knows it under any spelling.
pub(crate) fn canonical_key(category: RecordCategory, raw_name: &str) -> Option<&'static str> {
    alias_map(category).get(&fold_name(raw_name)).copied()
}

pub(crate) fn spec_for(category: RecordCategory, key: &str) -> Option<&'static FieldSpec> {
    fields_for(category).iter().find(|entry| entry.key == key)
}

fn alias_map(category: RecordCategory) -> &'static HashMap<String, &'static str> {
    let maps = ALIAS_MAPS.get_or_init(|| {
        [
            build_map(STUDENT_FIELDS),
            build_map(INFO_FIELDS),
            build_map(CANDIDACY_FIELDS),
        ]
    });

    match category {
        RecordCategory::Student => &maps[0],
        RecordCategory::PersonalInfo => &maps[1],
        RecordCategory::Candidacy => &maps[2],
    }
}

fn build_map(fields: &'static [FieldSpec]) -> HashMap<String, &'static str> {
    let mut map = HashMap::new();
    for entry in fields {
        map.insert(fold_name(entry.key), entry.key);
        for alias in entry.aliases {
            map.insert(fold_name(alias), entry.key);
        }
    }
    map
}

/// Case, underscore, hyphen and whitespace insensitive form of a field name.
pub(crate) fn fold_name(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | '\u{feff}' | '\u{200b}') && !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn folded_aliases_never_collide_within_a_category() {
        for category in RecordCategory::ordered() {
            let mut owners: HashMap<String, &'static str> = HashMap::new();
            for entry in fields_for(category) {
                let mut names: HashSet<String> = entry.aliases.iter().map(|a| fold_name(a)).collect();
                names.insert(fold_name(entry.key));
                for name in names {
                    if let Some(previous) = owners.insert(name.clone(), entry.key) {
                        panic!(
                            "{:?}: '{name}' maps to both {previous} and {}",
                            category, entry.key
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn id_variants_resolve_per_category() {
        for raw in ["IDNUM", "idNum", "id_num"] {
            assert_eq!(canonical_key(RecordCategory::Student, raw), Some("idNum"));
            assert_eq!(canonical_key(RecordCategory::PersonalInfo, raw), Some("id_num"));
            assert_eq!(canonical_key(RecordCategory::Candidacy, raw), Some("idNum"));
        }
    }

    #[test]
    fn analytics_columns_resolve_on_student_records() {
        assert_eq!(canonical_key(RecordCategory::Student, "yr_cde"), Some("yearCode"));
        assert_eq!(canonical_key(RecordCategory::Student, "career_gpa"), Some("careerGpa"));
        assert_eq!(canonical_key(RecordCategory::Student, "major_1"), Some("major1"));
        assert_eq!(canonical_key(RecordCategory::Student, "entrance_term"), Some("entranceTerm"));
        assert_eq!(canonical_key(RecordCategory::Student, "prog_cde"), Some("programCode"));
        assert_eq!(canonical_key(RecordCategory::Student, "favourite_colour"), None);
    }

    #[test]
    fn fold_ignores_case_and_separators() {
        assert_eq!(fold_name("\u{feff}Stud_employ_cde"), "studemploycde");
        assert_eq!(fold_name("CURRENT_CLASS_CDE"), fold_name("current-class cde"));
    }
}
