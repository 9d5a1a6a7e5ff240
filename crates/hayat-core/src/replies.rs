//! Bilingual reply templates. Every user-facing string lives here; each
//! function picks exactly one of two fixed templates by language and
//! substitutes positional arguments. The webhook boundary always
//! answers with one of these, never with a raw error.

use crate::types::enums::{Availability, Language, RequestCategory, RiskLevel};

pub fn mother_registered(lang: Language, public_id: &str, camp: &str, zone: &str) -> String {
    match lang {
        Language::English => format!(
            "Registered. Your id is {public_id} (camp {camp}, zone {zone}). Send EMERGENCY any time you need urgent help."
        ),
        Language::Arabic => format!(
            "تم التسجيل. رقمك هو {public_id} (مخيم {camp}، منطقة {zone}). أرسلي طوارئ في أي وقت تحتاجين مساعدة عاجلة."
        ),
    }
}

pub fn volunteer_registered(lang: Language, name: &str) -> String {
    match lang {
        Language::English => format!(
            "Thank you {name}, you are registered as a volunteer. Send AVAILABLE when ready to take cases."
        ),
        Language::Arabic => format!(
            "شكراً {name}، تم تسجيلك كمتطوعة. أرسلي متاحة عندما تكونين جاهزة لاستقبال الحالات."
        ),
    }
}

pub fn request_created(lang: Language, code: &str, notified: usize) -> String {
    match lang {
        Language::English => {
            if notified == 0 {
                format!(
                    "Help request {code} recorded. No volunteers are available right now; we keep trying."
                )
            } else if notified == 1 {
                format!("Help request {code} sent. 1 volunteer has been alerted.")
            } else {
                format!("Help request {code} sent. {notified} volunteers have been alerted.")
            }
        }
        Language::Arabic => {
            if notified == 0 {
                format!("تم تسجيل طلب المساعدة {code}. لا توجد متطوعات متاحات الآن؛ سنواصل المحاولة.")
            } else {
                format!("تم إرسال طلب المساعدة {code}. تم تنبيه {notified} من المتطوعات.")
            }
        }
    }
}

pub fn volunteer_alert(
    lang: Language,
    code: &str,
    category: RequestCategory,
    zone: &str,
    risk: RiskLevel,
) -> String {
    let cat = category_label(lang, category);
    match lang {
        Language::English => format!(
            "New case {code}: {cat} in zone {zone}, risk {risk:?}. Reply ACCEPT {code} to take it, or a number of minutes until you can arrive."
        ),
        Language::Arabic => format!(
            "حالة جديدة {code}: {cat} في منطقة {zone}، درجة الخطر {risk:?}. أرسلي قبول {code} لاستلامها، أو عدد الدقائق حتى وصولك."
        ),
    }
}

pub fn case_accepted(lang: Language, code: &str) -> String {
    match lang {
        Language::English => format!(
            "You accepted case {code}. Send COMPLETE {code} when the visit is done, or CANCEL {code} if you cannot continue."
        ),
        Language::Arabic => format!(
            "قبلت الحالة {code}. أرسلي انهاء {code} بعد انتهاء الزيارة، أو الغاء {code} إذا تعذر عليك الاستمرار."
        ),
    }
}

pub fn mother_case_accepted(lang: Language, code: &str, volunteer: &str) -> String {
    match lang {
        Language::English => {
            format!("A volunteer ({volunteer}) accepted your request {code} and is on the way.")
        }
        Language::Arabic => format!("قبلت متطوعة ({volunteer}) طلبك {code} وهي في الطريق إليك."),
    }
}

pub fn case_completed(lang: Language, code: &str, completed_total: u32) -> String {
    match lang {
        Language::English => format!(
            "Case {code} closed. Thank you, you have completed {completed_total} cases."
        ),
        Language::Arabic => format!("أُغلقت الحالة {code}. شكراً لك، أكملتِ {completed_total} حالة."),
    }
}

pub fn case_cancelled(lang: Language, code: &str) -> String {
    match lang {
        Language::English => format!("Case {code} has been cancelled."),
        Language::Arabic => format!("تم إلغاء الحالة {code}."),
    }
}

pub fn availability_set(lang: Language, availability: Availability) -> String {
    match lang {
        Language::English => match availability {
            Availability::Available => "You are now AVAILABLE and will receive case alerts.".to_string(),
            Availability::Busy => "You are marked BUSY. Send AVAILABLE when free again.".to_string(),
            Availability::Offline => "You are OFFLINE and will not receive alerts.".to_string(),
        },
        Language::Arabic => match availability {
            Availability::Available => "أنت الآن متاحة وستصلك تنبيهات الحالات.".to_string(),
            Availability::Busy => "تم تسجيلك كمشغولة. أرسلي متاحة عند فراغك.".to_string(),
            Availability::Offline => "أنت غير متصلة ولن تصلك تنبيهات.".to_string(),
        },
    }
}

pub fn mother_status(lang: Language, public_id: &str, zone: &str, active_case: Option<&str>) -> String {
    match lang {
        Language::English => match active_case {
            Some(code) => format!("{public_id}, zone {zone}. Your open case: {code}."),
            None => format!("{public_id}, zone {zone}. You have no open case."),
        },
        Language::Arabic => match active_case {
            Some(code) => format!("{public_id}، منطقة {zone}. حالتك المفتوحة: {code}."),
            None => format!("{public_id}، منطقة {zone}. لا توجد لديك حالة مفتوحة."),
        },
    }
}

pub fn volunteer_status(
    lang: Language,
    availability: Availability,
    current_case: Option<&str>,
    completed: u32,
) -> String {
    match lang {
        Language::English => match current_case {
            Some(code) => format!(
                "Status: {availability:?}, working case {code}, {completed} completed."
            ),
            None => format!("Status: {availability:?}, no assigned case, {completed} completed."),
        },
        Language::Arabic => match current_case {
            Some(code) => format!("الحالة: {availability:?}، تعملين على {code}، أكملتِ {completed}."),
            None => format!("الحالة: {availability:?}، لا توجد حالة مسندة، أكملتِ {completed}."),
        },
    }
}

pub fn help_text(lang: Language) -> String {
    match lang {
        Language::English => "Commands: REG MOTHER CAMP <c> ZONE <z> [DUE d-m] [RISK HIGH|MEDIUM|LOW] | REG VOLUNTEER CAMP <c> ZONE <z1,z2> [SKILL ...] | EMERGENCY | SUPPORT | ACCEPT <case> | COMPLETE <case> | CANCEL <case> | AVAILABLE | BUSY | OFFLINE | STATUS".to_string(),
        Language::Arabic => "الأوامر: تسجيل ام مخيم <..> منطقة <..> | تسجيل متطوعة مخيم <..> منطقة <..> | طوارئ | دعم | قبول <رقم> | انهاء <رقم> | الغاء <رقم> | متاحة | مشغولة | غير متصل | حالة".to_string(),
    }
}

pub fn eta_recorded(lang: Language, code: &str, minutes: u32) -> String {
    match lang {
        Language::English => {
            format!("Noted: {minutes} minutes to case {code}. You will be contacted if selected.")
        }
        Language::Arabic => format!("تم التسجيل: {minutes} دقيقة للحالة {code}. سيتم التواصل معك عند الاختيار."),
    }
}

pub fn not_registered(lang: Language) -> String {
    match lang {
        Language::English => "This number is not registered. Send REG MOTHER CAMP <c> ZONE <z> or REG VOLUNTEER CAMP <c> ZONE <z>, or just tell us in your own words.".to_string(),
        Language::Arabic => "هذا الرقم غير مسجل. أرسلي تسجيل ام مخيم <..> منطقة <..> أو تسجيل متطوعة، أو اكتبي لنا بكلماتك.".to_string(),
    }
}

pub fn case_not_found(lang: Language, code: &str) -> String {
    match lang {
        Language::English => format!("Case {code} was not found. Check the number and try again."),
        Language::Arabic => format!("لم يتم العثور على الحالة {code}. تحققي من الرقم وحاولي مجدداً."),
    }
}

pub fn wrong_state(lang: Language, code: &str) -> String {
    match lang {
        Language::English => format!("Case {code} is not in a state where that is possible."),
        Language::Arabic => format!("الحالة {code} ليست في وضع يسمح بذلك."),
    }
}

pub fn unauthorized(lang: Language, code: &str) -> String {
    match lang {
        Language::English => format!("Only the mother or the assigned volunteer can change case {code}."),
        Language::Arabic => format!("فقط الأم أو المتطوعة المسندة يمكنها تعديل الحالة {code}."),
    }
}

pub fn missing_field(lang: Language, field: &str) -> String {
    match lang {
        Language::English => format!("Missing {field}. Example: REG MOTHER CAMP A ZONE 3"),
        Language::Arabic => format!("حقل {field} مفقود. مثال: تسجيل ام مخيم A منطقة 3"),
    }
}

pub fn invalid_phone(lang: Language) -> String {
    match lang {
        Language::English => "We could not read your phone number. Please contact a health worker.".to_string(),
        Language::Arabic => "تعذر قراءة رقم هاتفك. يرجى التواصل مع عاملة صحية.".to_string(),
    }
}

pub fn internal_error(lang: Language) -> String {
    match lang {
        Language::English => "Sorry, something went wrong on our side. Please try again, or send HELP for the command list.".to_string(),
        Language::Arabic => "عذراً، حدث خلل لدينا. حاولي مرة أخرى، أو أرسلي مساعدة لقائمة الأوامر.".to_string(),
    }
}

pub fn collaborator_unavailable(lang: Language) -> String {
    match lang {
        Language::English => "Sorry, the assistant is unavailable right now. For emergencies send EMERGENCY.".to_string(),
        Language::Arabic => "عذراً، المساعد غير متوفر حالياً. في الحالات الطارئة أرسلي طوارئ.".to_string(),
    }
}

pub fn category_label(lang: Language, category: RequestCategory) -> String {
    match lang {
        Language::English => match category {
            RequestCategory::Labor => "labor",
            RequestCategory::Bleeding => "bleeding",
            RequestCategory::PainFever => "pain/fever",
            RequestCategory::BabyMovement => "reduced baby movement",
            RequestCategory::Advice => "advice",
            RequestCategory::Other => "other",
            RequestCategory::Emergency => "emergency",
            RequestCategory::Support => "support",
        }
        .to_string(),
        Language::Arabic => match category {
            RequestCategory::Labor => "مخاض",
            RequestCategory::Bleeding => "نزيف",
            RequestCategory::PainFever => "ألم/حمى",
            RequestCategory::BabyMovement => "قلة حركة الجنين",
            RequestCategory::Advice => "استشارة",
            RequestCategory::Other => "أخرى",
            RequestCategory::Emergency => "طوارئ",
            RequestCategory::Support => "دعم",
        }
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_exactly_one_template_per_language() {
        let en = request_created(Language::English, "HR-0001", 1);
        assert!(en.contains("1 volunteer"));
        assert!(!en.contains("متطوع"));
        let ar = request_created(Language::Arabic, "HR-0001", 2);
        assert!(ar.contains("HR-0001"));
        assert!(!ar.contains("alerted"));
    }

    #[test]
    fn zero_notified_is_a_distinct_message() {
        let en = request_created(Language::English, "HR-0002", 0);
        assert!(en.contains("No volunteers"));
    }
}
