//! Consulting service agreement.

use serde::Serialize;

use super::{party_box, payment_rows, signature_box, value_or_not_determined, Block, Clause, ClauseList, ClauseRenderer};
use crate::error::Result;
use crate::model::ContractInput;

/// Fixed business-policy constants quoted in the clause text.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ServicePolicy {
    /// Business days the client has to name a contact person.
    pub contact_days: u32,
    /// Business days of delay after which the consultant may suspend or terminate.
    pub suspension_days: u32,
    /// Calendar days of written notice for termination.
    pub notice_days: u32,
    /// Years confidentiality survives termination.
    pub confidentiality_years: u32,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        ServicePolicy { contact_days: 3, suspension_days: 15, notice_days: 15, confidentiality_years: 2 }
    }
}

pub(super) const TEXTS: &[(&str, &str)] = &[
    (
        "service/purpose",
        r#"
İşbu sözleşmenin konusu, {{ issuer_name }} ("Danışman") tarafından {{ client_name }} ("Müşteri") için aşağıda kapsamı belirtilen iş danışmanlığı hizmetlerinin sunulmasına ilişkin esas ve koşulların belirlenmesidir.
"#,
    ),
    (
        "service/scope_intro",
        "Danışman, sözleşme süresi boyunca aşağıdaki hizmetleri sunmayı kabul eder:",
    ),
    (
        "service/duration",
        r#"
Sözleşme, aşağıda belirtilen başlangıç tarihinde yürürlüğe girer ve bitiş tarihine kadar geçerlidir. Taraflar, süre bitiminden önce yazılı olarak anlaşmak kaydıyla sözleşmeyi aynı koşullarla uzatabilir.
"#,
    ),
    (
        "service/payment",
        "Hizmet bedeli ve ödeme planı aşağıdaki tabloda gösterilmiştir. Peşinat ödenmeden hizmetlere başlanmaz.",
    ),
    (
        "service/obligations_issuer",
        r#"
Danışmanın yükümlülükleri: Hizmetleri mesleki özen ve dürüstlük kuralları çerçevesinde, kararlaştırılan takvime uygun olarak yerine getirmek; Müşteriyi çalışmaların ilerleyişi hakkında düzenli olarak bilgilendirmek; Müşteriden edindiği bilgileri yalnızca sözleşmenin amacı doğrultusunda kullanmak.
"#,
    ),
    (
        "service/obligations_client",
        r#"
Müşterinin yükümlülükleri: Hizmetlerin yürütülmesi için gerekli bilgi, belge ve erişimleri zamanında ve eksiksiz sağlamak; ödemeleri belirtilen vadelerde yapmak; Danışmanın önerilerini değerlendirmek üzere yetkili kişileri toplantılara katılım için hazır bulundurmak.
"#,
    ),
    (
        "service/contact",
        r#"
Müşteri, sözleşmenin imzalanmasından itibaren {{ policy.contact_days }} iş günü içinde Danışman ile iletişimi yürütecek bir irtibat kişisi belirleyerek yazılı olarak bildirir. Danışmanın talep ettiği bilgi ve belgelerin bu süre içinde sağlanmaması halinde teslim takvimi gecikme süresi kadar ileri kayar. Gecikmenin {{ policy.suspension_days }} iş gününü aşması durumunda Danışman, hizmetleri askıya alma veya sözleşmeyi feshetme hakkına sahiptir; bu durumda ödenmiş bedeller iade edilmez.
"#,
    ),
    (
        "service/liability",
        r#"
Danışmanın işbu sözleşmeden doğan toplam sorumluluğu, her halükarda Müşteri tarafından fiilen ödenmiş hizmet bedeli ile sınırlıdır (sözleşme bedeli: {{ fee }}). Danışman; dolaylı zararlar, kâr kaybı ve Müşterinin önerileri uygulama biçiminden doğan sonuçlardan sorumlu tutulamaz.
"#,
    ),
    (
        "service/termination",
        r#"
Taraflardan her biri, {{ policy.notice_days }} gün önceden yazılı bildirimde bulunmak kaydıyla sözleşmeyi feshedebilir. Fesih Müşteri tarafından yapılırsa ödenmiş peşinat iade edilmez. Fesih Danışman tarafından, Müşteriden kaynaklanmayan bir sebeple yapılırsa, henüz hizmete başlanmamış döneme ait peşinat Müşteriye iade edilir.
"#,
    ),
    (
        "service/confidentiality",
        r#"
Taraflar, sözleşme süresince birbirlerinden edindikleri ticari, mali ve teknik bilgileri gizli tutmayı ve üçüncü kişilerle paylaşmamayı kabul eder. Bu yükümlülük, sözleşmenin sona ermesinden sonra {{ policy.confidentiality_years }} yıl süreyle devam eder.
"#,
    ),
    (
        "service/force_majeure",
        r#"
Doğal afet, salgın, savaş, grev, yasal düzenleme değişikliği gibi tarafların kontrolü dışındaki olaylar mücbir sebep sayılır. Mücbir sebep süresince tarafların yükümlülükleri askıya alınır; mücbir sebebin 60 günden uzun sürmesi halinde taraflardan her biri sözleşmeyi tazminatsız feshedebilir.
"#,
    ),
    (
        "service/ip",
        r#"
Danışman tarafından hazırlanan raporlar, sunumlar ve çalışma dokümanları, bedelin tamamının ödenmesiyle Müşterinin iç kullanımına açılır. Danışmanın önceden sahip olduğu yöntem, şablon ve araçlar üzerindeki fikri mülkiyet hakları Danışmanda kalır.
"#,
    ),
    (
        "service/communication",
        r#"
Taraflar arasındaki resmi yazışmalar, sözleşmede belirtilen e-posta adresleri üzerinden yapılır ve gönderim tarihinde tebliğ edilmiş sayılır. Toplantı talepleri en az 2 iş günü önceden iletilir; acil durumlar için irtibat kişileri telefonla aranabilir.
"#,
    ),
    (
        "service/disputes",
        "İşbu sözleşmeden doğacak uyuşmazlıkların çözümünde İstanbul (Çağlayan) Mahkemeleri ve İcra Daireleri yetkilidir.",
    ),
    (
        "service/general",
        r#"
Sözleşmede yapılacak değişiklikler ancak tarafların yazılı mutabakatı ile geçerlidir. Sözleşmenin herhangi bir hükmünün geçersiz sayılması diğer hükümlerin geçerliliğini etkilemez. İşbu sözleşme {{ input.contract_date }} tarihinde iki nüsha olarak düzenlenmiş ve taraflarca okunarak imzalanmıştır.
"#,
    ),
];

pub(super) fn clauses(input: &ContractInput, r: &ClauseRenderer) -> Result<Vec<Clause>> {
    let mut list = ClauseList::new();

    list.article(
        "TARAFLAR",
        vec![Block::Parties(
            party_box("HİZMET VEREN (DANIŞMAN)", &input.issuer),
            party_box("HİZMET ALAN (MÜŞTERİ)", &input.client),
        )],
    );
    list.article("SÖZLEŞMENİN KONUSU", vec![r.text("service/purpose")?]);

    let scope = if input.scope.trim().is_empty() {
        "(Hizmet kapsamı belirtilmedi)".to_string()
    } else {
        input.scope.clone()
    };
    list.article("HİZMET KAPSAMI", vec![r.text("service/scope_intro")?, Block::Text(scope)]);

    list.article(
        "SÖZLEŞME SÜRESİ",
        vec![
            r.text("service/duration")?,
            Block::Table(vec![
                ("Başlangıç Tarihi".to_string(), value_or_not_determined(&input.start_date)),
                ("Bitiş Tarihi".to_string(), value_or_not_determined(&input.end_date)),
                ("Toplam Süre".to_string(), value_or_not_determined(&input.duration)),
            ]),
        ],
    );
    list.article(
        "ÜCRET VE ÖDEME KOŞULLARI",
        vec![r.text("service/payment")?, Block::Table(payment_rows(input))],
    );
    list.article(
        "TARAFLARIN YÜKÜMLÜLÜKLERİ",
        vec![r.text("service/obligations_issuer")?, r.text("service/obligations_client")?],
    );
    list.article("İRTİBAT KİŞİSİ BELİRLENMESİ", vec![r.text("service/contact")?]);
    list.article("SORUMLULUĞUN SINIRLANDIRILMASI", vec![r.text("service/liability")?]);
    list.article("FESİH", vec![r.text("service/termination")?]);
    list.article("GİZLİLİK", vec![r.text("service/confidentiality")?]);
    list.article("MÜCBİR SEBEPLER", vec![r.text("service/force_majeure")?]);
    list.article("FİKRİ MÜLKİYET", vec![r.text("service/ip")?]);
    list.article("İLETİŞİM PROTOKOLÜ", vec![r.text("service/communication")?]);
    list.article("UYUŞMAZLIKLARIN ÇÖZÜMÜ", vec![r.text("service/disputes")?]);
    list.article("GENEL HÜKÜMLER", vec![r.text("service/general")?]);

    Ok(list.finish(Block::Signatures(
        signature_box("HİZMET VEREN", &input.issuer),
        signature_box("HİZMET ALAN", &input.client),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateKind;

    #[test]
    fn fifteen_numbered_articles_then_signatures() {
        let clauses = TemplateKind::Service.clauses(&ContractInput::default()).unwrap();
        assert_eq!(clauses.len(), 16);
        for (i, c) in clauses[..15].iter().enumerate() {
            assert_eq!(c.number, Some(i + 1));
        }
        assert_eq!(clauses[15].number, None);
        assert!(matches!(clauses[15].blocks[0], Block::Signatures(..)));
    }

    #[test]
    fn policy_constants_appear_in_text() {
        let clauses = TemplateKind::Service.clauses(&ContractInput::default()).unwrap();
        let contact = clauses.iter().find(|c| c.heading == "İRTİBAT KİŞİSİ BELİRLENMESİ").unwrap();
        assert!(contact.text().contains("3 iş günü"));
        assert!(contact.text().contains("15 iş gününü"));
        let confidentiality = clauses.iter().find(|c| c.heading == "GİZLİLİK").unwrap();
        assert!(confidentiality.text().contains("2 yıl"));
    }

    #[test]
    fn scope_is_kept_verbatim() {
        let input = ContractInput { scope: "- Pazar analizi\n- Süreç tasarımı".into(), ..Default::default() };
        let clauses = TemplateKind::Service.clauses(&input).unwrap();
        assert!(clauses[2].blocks.contains(&Block::Text(input.scope.clone())));
    }

    #[test]
    fn liability_quotes_the_fee() {
        let input = ContractInput { total_fee: "250000".into(), ..Default::default() };
        let clauses = TemplateKind::Service.clauses(&input).unwrap();
        assert!(clauses[7].text().contains("250.000 TL"));
    }
}
