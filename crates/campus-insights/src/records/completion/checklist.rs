use crate::records::normalizer::RecordCategory;

/// Ordered field set that defines a complete record for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChecklist {
    pub category: RecordCategory,
    pub fields: &'static [&'static str],
}

impl FieldChecklist {
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn for_category(category: RecordCategory) -> Self {
        match category {
            RecordCategory::Student => STUDENT_CHECKLIST,
            RecordCategory::PersonalInfo => INFO_CHECKLIST,
            RecordCategory::Candidacy => CANDIDACY_CHECKLIST,
        }
    }

    pub fn label(&self, key: &str) -> &'static str {
        self.category.field_label(key).unwrap_or("Unknown Field")
    }
}

pub const STUDENT_CHECKLIST: FieldChecklist = FieldChecklist {
    category: RecordCategory::Student,
    fields: &[
        "idNum",
        "studentEmployCode",
        "webGroup",
        "tuitionCode",
        "entranceYear",
        "entranceTerm",
        "currentClassCode",
        "numOfCourses",
        "hoursEnrolled",
        "termHoursEarned",
        "careerGpa",
        "degreeCode",
        "major1",
        "minor1",
        "concentration1",
    ],
};

pub const INFO_CHECKLIST: FieldChecklist = FieldChecklist {
    category: RecordCategory::PersonalInfo,
    fields: &[
        "id_num",
        "last_name",
        "first_name",
        "middle_name",
        "mobile_phone",
        "email_address",
        "appid",
        "name_format",
        "birth_name",
        "stud_mstr_employ",
    ],
};

// `udef1a1` is normalized but not scored.
pub const CANDIDACY_CHECKLIST: FieldChecklist = FieldChecklist {
    category: RecordCategory::Candidacy,
    fields: &[
        "idNum",
        "yearCode",
        "divisionCode",
        "stage",
        "programCode",
        "termCode",
        "hsOrgTypeAd",
        "schoolType",
        "clOrgTypeAd",
        "clGpa",
        "clTotalApCredits",
        "clTotalInstCredits",
        "act",
        "gat",
        "gre",
        "sat",
        "satRc",
        "satWc",
        "tef",
        "toepp",
        "birthDate",
        "citizenOf",
        "city",
        "country",
        "addressLine1",
        "birthName",
        "firstName",
        "lastName",
        "emailAddress",
        "gender",
        "mobile",
        "fatherAddress",
        "motherAddress",
        "fatherPhone",
        "motherPhone",
        "fatherOccupation",
        "motherOccupation",
        "appFeeDate",
    ],
};

/// Denominator of the combined score, derived from the three checklists.
pub const OVERALL_FIELD_COUNT: usize =
    STUDENT_CHECKLIST.len() + INFO_CHECKLIST.len() + CANDIDACY_CHECKLIST.len();
