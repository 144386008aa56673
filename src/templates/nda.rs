//! Mutual non-disclosure agreement.

use super::{party_box, signature_box, Block, Clause, ClauseList, ClauseRenderer};
use crate::error::Result;
use crate::model::ContractInput;

pub(super) const TEXTS: &[(&str, &str)] = &[
    (
        "nda/purpose",
        r#"
İşbu sözleşmenin amacı, {{ issuer_name }} ile {{ client_name }} arasında yürütülen veya yürütülmesi planlanan iş görüşmeleri ve danışmanlık çalışmaları kapsamında tarafların birbirlerine açıklayacakları gizli bilgilerin korunmasına ilişkin esasları belirlemektir.
"#,
    ),
    (
        "nda/definition",
        r#"
"Gizli Bilgi"; yazılı, sözlü veya elektronik ortamda paylaşılan ve aşağıdakilerle sınırlı olmamak üzere şu bilgileri kapsar:
a) Ticari sırlar, iş planları ve stratejiler,
b) Mali tablolar, bütçeler, fiyatlandırma ve maliyet bilgileri,
c) Müşteri, tedarikçi ve iş ortağı listeleri ile bunlara ait iletişim bilgileri,
d) Personel bilgileri ve organizasyon yapısı,
e) Teknik bilgiler, yazılımlar, süreç ve yöntemler,
f) Pazarlama planları, kampanyalar ve pazar araştırmaları,
g) Taraflarca açıkça "gizli" olarak işaretlenen diğer tüm bilgi ve belgeler.
"#,
    ),
    (
        "nda/obligations",
        r#"
Bilgiyi alan taraf:
1. Gizli Bilgiyi yalnızca sözleşmenin amacı doğrultusunda kullanır,
2. Gizli Bilgiyi karşı tarafın yazılı izni olmadan üçüncü kişilere açıklamaz,
3. Gizli Bilgiye erişimi, bilmesi gereken çalışanları ile sınırlar ve bu kişilerin de aynı gizlilik yükümlülüğüne uymasını sağlar,
4. Gizli Bilgiyi en az kendi gizli bilgilerini koruduğu özenle korur,
5. Yetkisiz bir açıklama veya kullanımı öğrendiğinde karşı tarafı derhal yazılı olarak bilgilendirir.
"#,
    ),
    (
        "nda/exceptions",
        r#"
Aşağıdaki bilgiler Gizli Bilgi sayılmaz:
a) Açıklandığı tarihte kamuya mal olmuş veya alan tarafın kusuru olmaksızın sonradan kamuya mal olan bilgiler,
b) Gizlilik yükümlülüğü bulunmayan üçüncü bir kişiden hukuka uygun olarak edinilen bilgiler,
c) Alan tarafça, Gizli Bilgiden yararlanılmaksızın bağımsız olarak geliştirilen bilgiler,
d) Kanun, mahkeme veya yetkili makam kararı gereği açıklanması zorunlu olan bilgiler; bu durumda alan taraf, açıklamadan önce karşı tarafı gecikmeksizin yazılı olarak bilgilendirmekle yükümlüdür.
"#,
    ),
    (
        "nda/duration",
        r#"
İşbu sözleşme imza tarihinde yürürlüğe girer. Gizlilik yükümlülükleri, taraflar arasındaki iş ilişkisinin sona ermesinden sonra {{ confidentiality_duration }} süreyle devam eder.
"#,
    ),
    (
        "nda/breach",
        r#"
Taraflardan birinin işbu sözleşmeye aykırı davranması halinde, aykırı davranan taraf karşı tarafa {{ penalty }} tutarında cezai şart ödemeyi kabul eder. Cezai şartın ödenmesi, karşı tarafın bu tutarı aşan zararlarının tazminini talep etme ve ihtiyati tedbir dahil her türlü hukuki yola başvurma hakkını ortadan kaldırmaz.
"#,
    ),
    (
        "nda/return",
        r#"
İş ilişkisinin sona ermesi veya karşı tarafın yazılı talebi üzerine, alan taraf Gizli Bilgi içeren tüm belge, kopya ve kayıtları 10 gün içinde iade eder ya da geri döndürülemez biçimde imha ederek bunu yazılı olarak teyit eder.
"#,
    ),
    (
        "nda/law",
        "İşbu sözleşme Türk Hukukuna tabidir. Uyuşmazlıkların çözümünde İstanbul (Çağlayan) Mahkemeleri ve İcra Daireleri yetkilidir.",
    ),
];

pub(super) fn clauses(input: &ContractInput, r: &ClauseRenderer) -> Result<Vec<Clause>> {
    let mut list = ClauseList::new();

    list.article(
        "TARAFLAR",
        vec![Block::Parties(
            party_box("AÇIKLAYAN / ALAN TARAF", &input.issuer),
            party_box("AÇIKLAYAN / ALAN TARAF", &input.client),
        )],
    );
    list.article("AMAÇ", vec![r.text("nda/purpose")?]);
    list.article("GİZLİ BİLGİNİN TANIMI", vec![r.text("nda/definition")?]);
    list.article("GİZLİLİK YÜKÜMLÜLÜKLERİ", vec![r.text("nda/obligations")?]);
    list.article("İSTİSNALAR", vec![r.text("nda/exceptions")?]);
    list.article("SÜRE", vec![r.text("nda/duration")?]);
    list.article("İHLAL VE CEZAİ ŞART", vec![r.text("nda/breach")?]);
    list.article("BİLGİLERİN İADESİ VE İMHASI", vec![r.text("nda/return")?]);
    list.article("UYGULANACAK HUKUK VE YETKİ", vec![r.text("nda/law")?]);

    Ok(list.finish(Block::Signatures(
        signature_box("TARAF 1", &input.issuer),
        signature_box("TARAF 2", &input.client),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateKind;

    #[test]
    fn nine_articles_then_signatures() {
        let clauses = TemplateKind::Nda.clauses(&ContractInput::default()).unwrap();
        assert_eq!(clauses.len(), 10);
        assert_eq!(clauses[8].number, Some(9));
        assert!(matches!(clauses[9].blocks[0], Block::Signatures(..)));
    }

    #[test]
    fn definition_enumerates_seven_categories() {
        let clauses = TemplateKind::Nda.clauses(&ContractInput::default()).unwrap();
        let text = clauses[2].text();
        for tag in ["a)", "b)", "c)", "d)", "e)", "f)", "g)"] {
            assert!(text.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn blank_penalty_is_not_determined() {
        let clauses = TemplateKind::Nda.clauses(&ContractInput::default()).unwrap();
        assert!(clauses[6].text().contains("(Belirlenmedi)"));
    }
}
