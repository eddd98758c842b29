//! 결과 병합 및 중복 제거
//!
//! purl과 라이선스는 문자열 동일성으로만 비교합니다. 결과는 정렬된 집합이므로
//! 입력 순서와 무관하게 같은 값을 돌려줍니다.

use std::collections::BTreeSet;

use crate::types::{ExtractedDocument, LoadOutput};

/// 값 목록의 중복을 제거합니다.
pub fn deduplicate<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// purl 목록과 라이선스 목록을 각각 중복 제거합니다.
pub fn deduplicate_pair<P, L>(purls: P, licenses: L) -> (BTreeSet<String>, BTreeSet<String>)
where
    P: IntoIterator<Item = String>,
    L: IntoIterator<Item = String>,
{
    (deduplicate(purls), deduplicate(licenses))
}

/// 한 입력 단위에서 모은 문서들을 누적 결과에 병합합니다.
///
/// 기존 결과와 합친 뒤 다시 중복 제거하므로 호출 후 `output`은 항상 일관된 상태입니다.
pub(crate) fn fold_into(output: &mut LoadOutput, documents: Vec<ExtractedDocument>) {
    let (purls, licenses): (Vec<_>, Vec<_>) = documents
        .into_iter()
        .map(|d| (d.purls, d.licenses))
        .unzip();

    let (purls, licenses) = deduplicate_pair(
        std::mem::take(&mut output.purls)
            .into_iter()
            .chain(purls.into_iter().flatten()),
        std::mem::take(&mut output.licenses)
            .into_iter()
            .chain(licenses.into_iter().flatten()),
    );
    output.purls = purls;
    output.licenses = licenses;
}
