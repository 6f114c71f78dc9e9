use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::models::question::Answer;

/// 打乱选项顺序，返回新的列表，不修改输入
pub fn shuffle_answers(answers: &[Answer]) -> Vec<Answer> {
    shuffle_answers_with(answers, &mut thread_rng())
}

/// 使用指定随机数生成器打乱选项（Fisher-Yates）
pub fn shuffle_answers_with<R: Rng + ?Sized>(answers: &[Answer], rng: &mut R) -> Vec<Answer> {
    let mut shuffled = answers.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
